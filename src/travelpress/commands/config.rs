use crate::commands::{CmdMessage, CmdResult, PressPaths};
use crate::config::PressConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &PressPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    match action {
        ConfigAction::ShowAll => {
            let config = PressConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = PressConfig::load(dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => result.add_message(CmdMessage::error(format!("Unknown config key: {}", key))),
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = PressConfig::load(dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e.to_string()));
                return Ok(res);
            }
            config.save(dir)?;
            let display_val = config.get(&key).unwrap_or_else(|| value.clone());
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn set_persists_and_show_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PressPaths::new(dir.path());

        let res = run(&paths, ConfigAction::Set("cloud-name".into(), "demo".into())).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Success);

        let res = run(&paths, ConfigAction::ShowKey("cloud-name".into())).unwrap();
        assert_eq!(res.messages[0].content, "demo");

        let res = run(&paths, ConfigAction::ShowAll).unwrap();
        assert_eq!(res.config.unwrap().cloud_name, "demo");
    }

    #[test]
    fn bad_values_are_reported_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PressPaths::new(dir.path());
        let res = run(&paths, ConfigAction::Set("page-size".into(), "0".into())).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());

        let res = run(&paths, ConfigAction::ShowKey("nope".into())).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Error);
    }
}
