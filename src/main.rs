mod render;

use anyhow::{bail, Context as _};
use clap::{Args, Parser, Subcommand};
use conan_core::config::data_dir_from_env_value;
use conan_core::{
    assess_combined, score_imaging, score_symptoms, AppContext, CoreConfig, FontSize,
    ImageReference, SettingsUpdate, SymptomVector,
};
use conan_types::PredictionResult;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pause before imaging results are shown, matching the pacing users expect from an upload.
const DEFAULT_PROCESSING_DELAY_MS: u64 = 2200;

#[derive(Parser)]
#[command(name = "conan")]
#[command(about = "Lung-cancer screening risk assessment")]
struct Cli {
    /// Directory for saved user and settings files (overrides CONAN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Print output as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Processing delay before imaging results, in milliseconds (overrides CONAN_PROCESSING_DELAY_MS)
    #[arg(long, global = true)]
    delay_ms: Option<u64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess risk from the symptom checklist
    Symptoms {
        #[command(flatten)]
        symptoms: SymptomArgs,
    },
    /// Assess risk from a chest X-ray image
    Imaging {
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Assess risk from both the symptom checklist and a chest X-ray image
    Combined {
        #[command(flatten)]
        image: ImageArgs,
        #[command(flatten)]
        symptoms: SymptomArgs,
    },
    /// List saved results for the signed-in user
    History,
    /// Summarise saved results for the signed-in user
    Dashboard,
    /// Show the most recent assessment again
    Results,
    /// Sign in so results are saved
    Login {
        /// Display name
        name: String,
        /// Email address
        email: String,
    },
    /// Sign out and forget the saved user
    Logout,
    /// Show or change settings
    Settings {
        /// small, normal or large
        #[arg(long)]
        font_size: Option<FontSize>,
        /// Enable or disable high contrast
        #[arg(long)]
        contrast_mode: Option<bool>,
        /// Record (or withdraw) consent to the privacy notice
        #[arg(long)]
        privacy_consent: Option<bool>,
    },
    /// Delete the saved user, all results and settings
    DeleteAllData {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
struct SymptomArgs {
    /// Current or past tobacco smoking
    #[arg(long)]
    smoking_history: bool,
    /// Chronic or worsening cough
    #[arg(long)]
    coughing: bool,
    /// Pain or discomfort in the chest area
    #[arg(long)]
    chest_pain: bool,
    /// Difficulty breathing or breathlessness
    #[arg(long)]
    shortness_of_breath: bool,
    /// High-pitched whistling sound when breathing
    #[arg(long)]
    wheezing: bool,
    /// Yellowing of fingertips (nicotine staining)
    #[arg(long)]
    yellow_fingers: bool,
    /// Trouble swallowing food or liquids
    #[arg(long)]
    swallowing_difficulty: bool,
    /// Persistent tiredness or lack of energy
    #[arg(long)]
    fatigue: bool,
    /// Pre-existing chronic health conditions
    #[arg(long)]
    chronic_disease: bool,
    /// Regular alcohol use
    #[arg(long)]
    alcohol_consuming: bool,
    /// Smoking-related social risk behaviour
    #[arg(long)]
    peer_pressure: bool,
    /// Known allergies (respiratory or other)
    #[arg(long)]
    allergy: bool,
    /// Chronic anxiety or stress
    #[arg(long)]
    anxiety: bool,
    /// Read all thirteen answers from a JSON object instead of flags
    #[arg(long)]
    answers: Option<PathBuf>,
    /// Score even when no symptom is selected
    #[arg(long)]
    allow_empty: bool,
}

impl SymptomArgs {
    fn flags(&self) -> SymptomVector {
        SymptomVector {
            smoking_history: self.smoking_history,
            coughing: self.coughing,
            chest_pain: self.chest_pain,
            shortness_of_breath: self.shortness_of_breath,
            wheezing: self.wheezing,
            yellow_fingers: self.yellow_fingers,
            swallowing_difficulty: self.swallowing_difficulty,
            fatigue: self.fatigue,
            chronic_disease: self.chronic_disease,
            alcohol_consuming: self.alcohol_consuming,
            peer_pressure: self.peer_pressure,
            allergy: self.allergy,
            anxiety: self.anxiety,
        }
    }

    fn to_vector(&self) -> anyhow::Result<SymptomVector> {
        let flags = self.flags();

        let vector = match &self.answers {
            Some(path) => {
                if flags.selected_count() > 0 {
                    bail!("use either --answers or symptom flags, not both");
                }
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                SymptomVector::from_json_str(&json)?
            }
            None => flags,
        };

        if vector.selected_count() == 0 && !self.allow_empty {
            bail!("please select at least one symptom (or pass --allow-empty)");
        }
        Ok(vector)
    }
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Chest X-ray image file
    #[arg(required_unless_present = "identifier")]
    image: Option<PathBuf>,
    /// Image identifier (file name followed by byte size) to use instead of a file
    #[arg(long, conflicts_with = "image")]
    identifier: Option<String>,
}

impl ImageArgs {
    fn identifier(&self) -> anyhow::Result<String> {
        match (&self.identifier, &self.image) {
            (Some(identifier), _) => Ok(identifier.clone()),
            (None, Some(path)) => Ok(ImageReference::from_path(path)?.identifier()),
            (None, None) => bail!("an image file or --identifier is required"),
        }
    }
}

struct RunOptions {
    json: bool,
    processing_delay: Duration,
}

fn processing_delay_from_env_value(value: Option<String>) -> anyhow::Result<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let ms = match value {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("CONAN_PROCESSING_DELAY_MS must be milliseconds, got '{v}'"))?,
        None => DEFAULT_PROCESSING_DELAY_MS,
    };
    Ok(Duration::from_millis(ms))
}

/// Main entry point for the Conan command-line tool.
///
/// # Environment Variables
/// - `CONAN_DATA_DIR`: directory for saved user and settings files (default: "conan_data")
/// - `CONAN_PROCESSING_DELAY_MS`: pause before imaging results (default: 2200)
/// - `RUST_LOG`: additional log filter directives; `conan=info` is always added and logs go to
///   stderr
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("conan=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => data_dir_from_env_value(std::env::var("CONAN_DATA_DIR").ok()),
    };
    let processing_delay = match cli.delay_ms {
        Some(ms) => Duration::from_millis(ms),
        None => processing_delay_from_env_value(std::env::var("CONAN_PROCESSING_DELAY_MS").ok())?,
    };

    let cfg = Arc::new(CoreConfig::new(data_dir)?);
    let mut ctx = AppContext::load(cfg)?;
    let opts = RunOptions {
        json: cli.json,
        processing_delay,
    };
    tracing::debug!(
        data_dir = %ctx.config().data_dir().display(),
        delay_ms = opts.processing_delay.as_millis() as u64,
        "starting"
    );

    let mut out = std::io::stdout();
    run(cli.command, &mut ctx, &opts, &mut out).await
}

async fn run<W: Write>(
    command: Option<Commands>,
    ctx: &mut AppContext,
    opts: &RunOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Some(Commands::Symptoms { symptoms }) => {
            let vector = symptoms.to_vector()?;
            privacy_notice(ctx);
            let result = score_symptoms(&vector);
            present(ctx, opts, out, result)?;
        }
        Some(Commands::Imaging { image }) => {
            let identifier = image.identifier()?;
            privacy_notice(ctx);
            simulate_processing(opts.processing_delay).await;
            let result = score_imaging(&identifier);
            present(ctx, opts, out, result)?;
        }
        Some(Commands::Combined { image, symptoms }) => {
            let vector = symptoms.to_vector()?;
            let identifier = image.identifier()?;
            privacy_notice(ctx);
            simulate_processing(opts.processing_delay).await;
            let result = assess_combined(&vector, &identifier)?;
            present(ctx, opts, out, result)?;
        }
        Some(Commands::History) => {
            let user = ctx.require_user("history")?;
            if opts.json {
                render::write_json(out, &user.results)?;
            } else {
                render::write_history(out, user)?;
            }
        }
        Some(Commands::Results) => match ctx.last_result() {
            Some(result) if opts.json => render::write_json(out, result)?,
            Some(result) => render::write_result(out, result)?,
            None => writeln!(
                out,
                "No assessment yet. Run `conan symptoms`, `conan imaging` or `conan combined` first."
            )?,
        },
        Some(Commands::Dashboard) => {
            let summary = ctx.require_user("dashboard")?.results.summary();
            if opts.json {
                render::write_json(out, &summary)?;
            } else {
                render::write_dashboard(out, &summary)?;
            }
        }
        Some(Commands::Login { name, email }) => {
            let user = ctx.login(&name, &email)?;
            writeln!(out, "Signed in as {} <{}>.", user.name, user.email)?;
        }
        Some(Commands::Logout) => {
            if ctx.user().is_none() {
                writeln!(out, "Not signed in.")?;
            } else {
                ctx.logout()?;
                writeln!(out, "Signed out.")?;
            }
        }
        Some(Commands::Settings {
            font_size,
            contrast_mode,
            privacy_consent,
        }) => {
            let settings = ctx.update_settings(SettingsUpdate {
                font_size,
                contrast_mode,
                privacy_consented: privacy_consent,
            })?;
            if opts.json {
                render::write_json(out, settings)?;
            } else {
                render::write_settings(out, settings)?;
            }
        }
        Some(Commands::DeleteAllData { yes }) => {
            if !yes {
                bail!("refusing to delete all data without --yes");
            }
            ctx.delete_all_data()?;
            writeln!(out, "All saved results, account details and settings were deleted.")?;
        }
        None => {
            writeln!(out, "Use 'conan --help' for commands")?;
        }
    }

    Ok(())
}

async fn simulate_processing(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    eprintln!("Analyzing image...");
    tokio::time::sleep(delay).await;
}

fn privacy_notice(ctx: &AppContext) {
    if ctx.settings().needs_privacy_consent() {
        eprintln!(
            "Privacy notice: inputs are processed locally and results are saved only when signed in. \
             Run `conan settings --privacy-consent true` to acknowledge."
        );
    }
}

fn present<W: Write>(
    ctx: &mut AppContext,
    opts: &RunOptions,
    out: &mut W,
    result: PredictionResult,
) -> anyhow::Result<()> {
    let saved = ctx.save_result(result)?;
    let result = ctx
        .last_result()
        .context("assessment result was not retained")?;

    if opts.json {
        render::write_json(out, &render::AssessmentOutput { result, saved })?;
    } else {
        render::write_result(out, result)?;
        writeln!(out)?;
        render::write_saved_notice(out, ctx.user())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use conan_core::{RiskLevel, SourceType};
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> AppContext {
        let cfg = CoreConfig::new(temp.path().to_path_buf()).unwrap();
        AppContext::load(Arc::new(cfg)).unwrap()
    }

    fn opts(json: bool) -> RunOptions {
        RunOptions {
            json,
            processing_delay: Duration::ZERO,
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    async fn run_args(ctx: &mut AppContext, args: &[&str]) -> anyhow::Result<String> {
        let cli = parse(args);
        let mut buf = Vec::new();
        run(cli.command, ctx, &opts(cli.json), &mut buf).await?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_symptom_flags_build_vector() {
        let cli = parse(&["conan", "symptoms", "--coughing", "--chest-pain"]);
        let Some(Commands::Symptoms { symptoms }) = cli.command else {
            panic!("expected symptoms command");
        };
        let vector = symptoms.to_vector().unwrap();
        assert!(vector.coughing && vector.chest_pain);
        assert_eq!(vector.selected_count(), 2);
    }

    #[test]
    fn test_empty_checklist_requires_allow_empty() {
        let args = SymptomArgs::default();
        assert!(args.to_vector().is_err());

        let args = SymptomArgs {
            allow_empty: true,
            ..SymptomArgs::default()
        };
        assert_eq!(args.to_vector().unwrap(), SymptomVector::uniform(false));
    }

    #[test]
    fn test_answers_file_must_be_complete() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers.json");
        std::fs::write(&path, r#"{"coughing": true}"#).unwrap();

        let args = SymptomArgs {
            answers: Some(path),
            ..SymptomArgs::default()
        };
        let err = args.to_vector().expect_err("partial answers must fail");
        assert!(err.to_string().contains("missing symptom keys"));
    }

    #[test]
    fn test_answers_file_conflicts_with_flags() {
        let args = SymptomArgs {
            answers: Some(PathBuf::from("answers.json")),
            anxiety: true,
            ..SymptomArgs::default()
        };
        assert!(args.to_vector().is_err());
    }

    #[test]
    fn test_processing_delay_from_env_value() {
        assert_eq!(
            processing_delay_from_env_value(None).unwrap(),
            Duration::from_millis(DEFAULT_PROCESSING_DELAY_MS)
        );
        assert_eq!(
            processing_delay_from_env_value(Some("0".into())).unwrap(),
            Duration::ZERO
        );
        assert!(processing_delay_from_env_value(Some("soon".into())).is_err());
    }

    #[tokio::test]
    async fn test_imaging_identifier_json_output() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        let text = run_args(&mut ctx, &["conan", "--json", "imaging", "--identifier", "d"])
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["result"]["riskLevel"], "low");
        assert_eq!(value["result"]["confidence"], 82);
        assert_eq!(value["saved"], false);
    }

    #[tokio::test]
    async fn test_signed_in_results_are_saved_to_history() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);

        run_args(&mut ctx, &["conan", "login", "Ada", "ada@example.org"])
            .await
            .unwrap();
        run_args(&mut ctx, &["conan", "symptoms", "--smoking-history", "--coughing"])
            .await
            .unwrap();
        run_args(
            &mut ctx,
            &["conan", "combined", "--identifier", "Z", "--anxiety"],
        )
        .await
        .unwrap();

        let user = ctx.user().unwrap();
        assert_eq!(user.results.len(), 2);
        let latest = user.results.latest().unwrap();
        assert_eq!(latest.source_type, SourceType::Combined);
        // low symptoms (anxiety only) + high imaging -> moderate
        assert_eq!(latest.risk_level, RiskLevel::Moderate);

        let history = run_args(&mut ctx, &["conan", "--json", "history"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&history).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["type"], "combined");
    }

    #[tokio::test]
    async fn test_results_shows_last_assessment_from_earlier_run() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        let text = run_args(&mut ctx, &["conan", "results"]).await.unwrap();
        assert!(text.starts_with("No assessment yet"));

        run_args(&mut ctx, &["conan", "imaging", "--identifier", "Z"])
            .await
            .unwrap();

        // A fresh context stands in for the next process.
        let mut next = context(&temp);
        let text = run_args(&mut next, &["conan", "results"]).await.unwrap();
        assert!(text.starts_with("HIGH RISK (79% confidence)"));

        let json = run_args(&mut next, &["conan", "--json", "results"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "imaging");
    }

    #[tokio::test]
    async fn test_history_requires_sign_in() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        let err = run_args(&mut ctx, &["conan", "history"])
            .await
            .expect_err("history without user");
        assert!(err.to_string().contains("requires a signed-in user"));
    }

    #[tokio::test]
    async fn test_settings_update_and_delete_all_data() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);

        let text = run_args(
            &mut ctx,
            &["conan", "settings", "--font-size", "large", "--contrast-mode", "true"],
        )
        .await
        .unwrap();
        assert!(text.contains("Font size: Large (18px)"));
        assert!(text.contains("High contrast: true"));

        assert!(run_args(&mut ctx, &["conan", "delete-all-data"]).await.is_err());
        run_args(&mut ctx, &["conan", "delete-all-data", "--yes"])
            .await
            .unwrap();
        assert!(ctx.settings().needs_privacy_consent());
        assert_eq!(ctx.settings().font_size, FontSize::Normal);
    }
}
