use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use concierge_core::{CatalogError, CatalogSpec, IntentCatalog};
use thiserror::Error;

const ENGLISH_CATALOG: &str = include_str!("../catalogs/en.toml");
const UKRAINIAN_CATALOG: &str = include_str!("../catalogs/uk.toml");
const DATA_DIR_ENV: &str = "CONCIERGE_DATA_DIR";
const APP_DIR: &str = "concierge";

/// Language of the built-in catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Uk,
}

impl Locale {
    fn catalog_source(self) -> &'static str {
        match self {
            Locale::En => ENGLISH_CATALOG,
            Locale::Uk => UKRAINIAN_CATALOG,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read catalog at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse toml at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("built-in {locale:?} catalog is malformed: {source}")]
    Embedded {
        locale: Locale,
        source: toml::de::Error,
    },
    #[error("invalid catalog {origin}: {source}")]
    Catalog {
        origin: String,
        source: CatalogError,
    },
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<IntentCatalog, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let spec: CatalogSpec = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    IntentCatalog::from_spec(spec).map_err(|source| ConfigError::Catalog {
        origin: path.display().to_string(),
        source,
    })
}

pub fn embedded_catalog(locale: Locale) -> Result<IntentCatalog, ConfigError> {
    let spec: CatalogSpec = toml::from_str(locale.catalog_source())
        .map_err(|source| ConfigError::Embedded { locale, source })?;

    IntentCatalog::from_spec(spec).map_err(|source| ConfigError::Catalog {
        origin: format!("built-in {locale:?}"),
        source,
    })
}

/// Where the address book and notebook live: the explicit flag, then
/// `CONCIERGE_DATA_DIR`, then the platform data directory, then `.`.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(data_dir_from_env)
        .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn data_dir_from_env() -> Option<PathBuf> {
    env::var_os(DATA_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn built_in_catalogs_are_valid() {
        let en = embedded_catalog(Locale::En).expect("english catalog");
        let uk = embedded_catalog(Locale::Uk).expect("ukrainian catalog");

        assert_eq!(en.len(), 12);
        assert_eq!(uk.len(), 12);
        let en_ids: Vec<_> = en.entries().map(|e| e.intent().as_str()).collect();
        let uk_ids: Vec<_> = uk.entries().map(|e| e.intent().as_str()).collect();
        assert_eq!(en_ids, uk_ids);
    }

    #[test]
    fn loads_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
version = 1

[[intent]]
id = "cancel"
phrases = ["cancel"]

[[intent]]
id = "exit"
phrases = ["exit", "quit"]
"#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).expect("should parse catalog");
        assert_eq!(catalog.get("exit").unwrap().phrases(), ["exit", "quit"]);
    }

    #[test]
    fn reports_invalid_catalog_files() {
        let err = load_catalog("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version = ").unwrap();
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version = 1\n[[intent]]\nid = \"exit\"\nphrases = [\"exit\"]").unwrap();
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Catalog {
                source: CatalogError::MissingControlIntent("cancel"),
                ..
            }
        ));
    }

    #[test]
    fn data_dir_prefers_flag_then_env() {
        let flag = PathBuf::from("/tmp/from-flag");
        assert_eq!(resolve_data_dir(Some(flag.clone())), flag);

        // SAFETY: test process controls its own environment and uses a unique key.
        unsafe { env::set_var(DATA_DIR_ENV, "/tmp/from-env") };
        assert_eq!(resolve_data_dir(None), PathBuf::from("/tmp/from-env"));
        // SAFETY: test process controls its own environment and uses a unique key.
        unsafe { env::remove_var(DATA_DIR_ENV) };

        assert_ne!(resolve_data_dir(None), PathBuf::from("/tmp/from-env"));
    }
}
