use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub carbo_path: PathBuf,
    pub meal_log_path: PathBuf,
    pub shopping_list_path: PathBuf,
    pub out_dir: PathBuf,
    pub img_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |name: &str, default: &str| {
            PathBuf::from(lookup(name).unwrap_or_else(|| default.to_string()))
        };
        Self {
            carbo_path: path("CARBO_PATH", "carbo.csv"),
            meal_log_path: path("MEAL_LOG_PATH", "meshi.yaml"),
            shopping_list_path: path("SHOPPING_LIST_PATH", "kaimono_lst.yaml"),
            out_dir: path("OUT_DIR", "out"),
            img_dir: path("IMG_DIR", "img"),
        }
    }

    pub fn meal_report_path(&self) -> PathBuf {
        self.out_dir.join("meshi.md")
    }

    pub fn shopping_report_path(&self) -> PathBuf {
        self.out_dir.join("kaimono.md")
    }
}
