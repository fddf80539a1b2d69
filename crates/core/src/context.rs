//! Application context: settings, signed-in user and the most recent result.
//!
//! One `AppContext` is created at startup from a [`CoreConfig`] and handed by reference to
//! whatever needs it. Every mutating operation is persisted to the configured data directory
//! before the in-memory state changes, so a failed write leaves both as they were.

use crate::config::CoreConfig;
use crate::settings::{Settings, SettingsUpdate};
use crate::store::{read_json, remove_file, write_json};
use crate::user::User;
use crate::{AssessmentError, AssessmentResult};
use conan_types::PredictionResult;
use std::sync::Arc;

#[derive(Debug)]
pub struct AppContext {
    cfg: Arc<CoreConfig>,
    settings: Settings,
    user: Option<User>,
    last_result: Option<PredictionResult>,
}

impl AppContext {
    /// Loads settings and user from the data directory.
    ///
    /// Missing files mean defaults (no user, default settings, no last result).
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::FileRead` or `AssessmentError::Deserialization` if a stored file
    /// exists but cannot be read or parsed.
    pub fn load(cfg: Arc<CoreConfig>) -> AssessmentResult<Self> {
        let settings = read_json::<Settings>(&cfg.settings_file())?.unwrap_or_default();
        let user = read_json::<User>(&cfg.user_file())?;
        let last_result = read_json::<PredictionResult>(&cfg.last_result_file())?;

        tracing::info!(
            data_dir = %cfg.data_dir().display(),
            signed_in = user.is_some(),
            has_last_result = last_result.is_some(),
            "loaded application context"
        );

        Ok(Self {
            cfg,
            settings,
            user,
            last_result,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.last_result.as_ref()
    }

    /// Signs in a new user, replacing any existing one.
    pub fn login(&mut self, name: &str, email: &str) -> AssessmentResult<&User> {
        let user = User::sign_in(name, email)?;
        write_json(&self.cfg.user_file(), &user)?;
        tracing::info!(user_id = %user.id, "signed in");
        Ok(self.user.insert(user))
    }

    pub fn logout(&mut self) -> AssessmentResult<()> {
        remove_file(&self.cfg.user_file())?;
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "signed out");
        }
        Ok(())
    }

    /// Makes `result` the last result and, when signed in, records it in the user's history.
    ///
    /// The last result is written for signed-out sessions too, so a later command can show it.
    ///
    /// # Arguments
    ///
    /// * `result` - A freshly computed assessment.
    ///
    /// # Returns
    ///
    /// `true` if the result was stored in a user's history, `false` if no one is signed in.
    ///
    /// # Errors
    ///
    /// Returns a storage error if either file cannot be written. The in-memory state is only
    /// updated for files that were written successfully.
    pub fn save_result(&mut self, result: PredictionResult) -> AssessmentResult<bool> {
        write_json(&self.cfg.last_result_file(), &result)?;
        self.last_result = Some(result.clone());

        let Some(current) = self.user.as_ref() else {
            return Ok(false);
        };

        let mut user = current.clone();
        user.record(result);
        write_json(&self.cfg.user_file(), &user)?;
        tracing::info!(user_id = %user.id, saved = user.results.len(), "saved result");
        self.user = Some(user);
        Ok(true)
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> AssessmentResult<&Settings> {
        if update.is_empty() {
            return Ok(&self.settings);
        }

        let mut settings = self.settings;
        settings.apply(update);
        write_json(&self.cfg.settings_file(), &settings)?;
        self.settings = settings;
        Ok(&self.settings)
    }

    /// Clears the user, their history, the settings and the last result, on disk and in memory.
    ///
    /// Each piece of in-memory state is cleared as soon as its file is gone; if a removal fails,
    /// the pieces not yet removed stay in place.
    pub fn delete_all_data(&mut self) -> AssessmentResult<()> {
        remove_file(&self.cfg.user_file())?;
        self.user = None;
        remove_file(&self.cfg.settings_file())?;
        self.settings = Settings::default();
        remove_file(&self.cfg.last_result_file())?;
        self.last_result = None;
        tracing::info!(data_dir = %self.cfg.data_dir().display(), "deleted all data");
        Ok(())
    }

    /// The signed-in user, or an error naming the operation that needs one.
    pub fn require_user(&self, operation: &str) -> AssessmentResult<&User> {
        self.user.as_ref().ok_or_else(|| {
            AssessmentError::InvalidInput(format!("{operation} requires a signed-in user"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::score_imaging;
    use crate::settings::FontSize;
    use crate::symptoms::{score_symptoms, SymptomVector};
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> AppContext {
        let cfg = CoreConfig::new(temp.path().join("data")).unwrap();
        AppContext::load(Arc::new(cfg)).unwrap()
    }

    #[test]
    fn test_load_empty_dir_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        assert!(ctx.user().is_none());
        assert_eq!(*ctx.settings(), Settings::default());
        assert!(ctx.last_result().is_none());
    }

    #[test]
    fn test_save_result_without_user_only_sets_last_result() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        let stored = ctx.save_result(score_imaging("")).unwrap();
        assert!(!stored);
        assert!(ctx.last_result().is_some());
        assert!(ctx.config().last_result_file().exists());
        assert!(!ctx.config().user_file().exists());
    }

    #[test]
    fn test_login_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.login("Ada", "ada@example.org").unwrap();

        let result = score_symptoms(&SymptomVector::uniform(true));
        assert!(ctx.save_result(result.clone()).unwrap());

        let reloaded = context(&temp);
        let user = reloaded.user().expect("user persisted");
        assert_eq!(user.name.as_str(), "Ada");
        assert_eq!(user.results.latest(), Some(&result));
        assert_eq!(reloaded.last_result(), Some(&result));
    }

    #[test]
    fn test_last_result_survives_reload_without_user() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        let result = score_imaging("Z");
        ctx.save_result(result.clone()).unwrap();

        let reloaded = context(&temp);
        assert!(reloaded.user().is_none());
        assert_eq!(reloaded.last_result(), Some(&result));
    }

    #[test]
    fn test_failed_history_write_leaves_user_unchanged() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.login("Ada", "ada@example.org").unwrap();

        // A directory in place of the user file makes the rename fail.
        let user_file = ctx.config().user_file();
        std::fs::remove_file(&user_file).unwrap();
        std::fs::create_dir(&user_file).unwrap();

        let err = ctx.save_result(score_imaging("Z")).expect_err("write must fail");
        assert!(matches!(err, AssessmentError::FileWrite(_)));
        assert!(ctx.user().unwrap().results.is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_state_not_yet_removed() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.login("Ada", "ada@example.org").unwrap();
        ctx.update_settings(SettingsUpdate {
            contrast_mode: Some(true),
            ..SettingsUpdate::default()
        })
        .unwrap();

        let settings_file = ctx.config().settings_file();
        std::fs::remove_file(&settings_file).unwrap();
        std::fs::create_dir(&settings_file).unwrap();
        std::fs::write(settings_file.join("keep"), "x").unwrap();

        let err = ctx.delete_all_data().expect_err("removal must fail");
        assert!(matches!(err, AssessmentError::FileRemove(_)));
        assert!(ctx.user().is_none());
        assert!(!ctx.config().user_file().exists());
        assert!(ctx.settings().contrast_mode);
    }

    #[test]
    fn test_logout_removes_user_file() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.login("Ada", "ada@example.org").unwrap();
        ctx.logout().unwrap();
        assert!(ctx.user().is_none());
        assert!(!ctx.config().user_file().exists());
        assert!(ctx.require_user("history").is_err());
    }

    #[test]
    fn test_update_settings_persists() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.update_settings(SettingsUpdate {
            font_size: Some(FontSize::Large),
            privacy_consented: Some(true),
            ..SettingsUpdate::default()
        })
        .unwrap();

        let reloaded = context(&temp);
        assert_eq!(reloaded.settings().font_size, FontSize::Large);
        assert!(!reloaded.settings().needs_privacy_consent());
    }

    #[test]
    fn test_empty_settings_update_does_not_write() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.update_settings(SettingsUpdate::default()).unwrap();
        assert!(!ctx.config().settings_file().exists());
    }

    #[test]
    fn test_delete_all_data() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.login("Ada", "ada@example.org").unwrap();
        ctx.update_settings(SettingsUpdate {
            contrast_mode: Some(true),
            ..SettingsUpdate::default()
        })
        .unwrap();
        ctx.save_result(score_imaging("Z")).unwrap();

        ctx.delete_all_data().unwrap();
        assert!(ctx.user().is_none());
        assert!(ctx.last_result().is_none());
        assert_eq!(*ctx.settings(), Settings::default());
        assert!(!ctx.config().user_file().exists());
        assert!(!ctx.config().settings_file().exists());
        assert!(!ctx.config().last_result_file().exists());
        assert!(context(&temp).last_result().is_none());
    }

    #[test]
    fn test_load_corrupt_user_file_fails() {
        let temp = TempDir::new().unwrap();
        let cfg = CoreConfig::new(temp.path().to_path_buf()).unwrap();
        std::fs::write(cfg.user_file(), "not json").unwrap();
        let err = AppContext::load(Arc::new(cfg)).expect_err("corrupt user file");
        assert!(matches!(err, AssessmentError::Deserialization(_)));
    }
}
