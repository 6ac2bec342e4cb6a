use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::ReportError;
use crate::images::FsImageStore;
use crate::meals::load_meal_log;
use crate::nutrition::load_reference;
use crate::report::MealReport;
use crate::shopping::load_shopping_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Meal log report
    #[value(name = "meshi", alias = "meals")]
    Meals,
    /// Shopping checklist
    #[value(name = "kaimono", alias = "shopping")]
    Shopping,
}

pub fn run(mode: Mode, config: &AppConfig) -> anyhow::Result<PathBuf> {
    match mode {
        Mode::Meals => render_meal_report(config),
        Mode::Shopping => render_shopping_list(config),
    }
}

pub fn render_meal_report(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let reference = load_reference(&config.carbo_path)?;
    let log = load_meal_log(&config.meal_log_path)?;
    let images = FsImageStore::new(&config.img_dir);

    let out = config.meal_report_path();
    let lines = write_lines(&out, MealReport::new(&log, &reference, &images))
        .context("render meal report")?;
    info!(path = %out.display(), lines, "meal report written");
    Ok(out)
}

pub fn render_shopping_list(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let reference = load_reference(&config.carbo_path)?;
    let list = load_shopping_list(&config.shopping_list_path)?;

    let out = config.shopping_report_path();
    let lines = write_lines(&out, list.lines(&reference)).context("render shopping list")?;
    info!(path = %out.display(), lines, "shopping list written");
    Ok(out)
}

/// Streams `lines` into `path`. The file only appears once every line was
/// produced; on error the partial output is removed.
pub fn write_lines<I>(path: &Path, lines: I) -> anyhow::Result<usize>
where
    I: IntoIterator<Item = Result<String, ReportError>>,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = partial_path(path);

    let result = stream_to(&tmp, lines);
    match result {
        Ok(count) => {
            fs::rename(&tmp, path)
                .with_context(|| format!("move {} to {}", tmp.display(), path.display()))?;
            Ok(count)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "render failed; discarding partial output");
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn stream_to<I>(tmp: &Path, lines: I) -> anyhow::Result<usize>
where
    I: IntoIterator<Item = Result<String, ReportError>>,
{
    let file = File::create(tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut out = BufWriter::new(file);
    let mut count = 0;
    for line in lines {
        writeln!(out, "{}", line?)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod app_tests {
    use super::*;

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig {
            carbo_path: dir.join("carbo.csv"),
            meal_log_path: dir.join("meshi.yaml"),
            shopping_list_path: dir.join("kaimono_lst.yaml"),
            out_dir: dir.join("out"),
            img_dir: dir.join("img"),
        }
    }

    #[test]
    fn write_lines_creates_file_on_success() {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        let path = dir.path().join("nested/out.md");
        let lines = vec![Ok("# a".to_string()), Ok(String::new()), Ok("b".to_string())];

        let count = write_lines(&path, lines).expect("write should succeed");
        assert_eq!(count, 3);
        assert_eq!(fs::read_to_string(&path).expect("read should succeed"), "# a\n\nb\n");
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn write_lines_leaves_nothing_on_error() {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        let path = dir.path().join("out.md");
        let lines = vec![
            Ok("# a".to_string()),
            Err(ReportError::InvalidFood {
                key: "banana".into(),
                indicator: "1本".into(),
            }),
            Ok("never".to_string()),
        ];

        let err = write_lines(&path, lines).unwrap_err();
        assert!(err.to_string().contains("banana"));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn failed_render_keeps_previous_report() {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        let path = dir.path().join("out.md");
        fs::write(&path, "old\n").expect("write should succeed");

        let lines = vec![Err(ReportError::InvalidItem("!".into()))];
        assert!(write_lines(&path, lines).is_err());
        assert_eq!(fs::read_to_string(&path).expect("read should succeed"), "old\n");
    }

    #[test]
    fn meal_mode_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        let config = config_in(dir.path());
        fs::write(&config.carbo_path, "id,title,amount,unit,carbo\nrice,White Rice,150,g,55.8,x\n")
            .expect("write should succeed");
        fs::write(
            &config.meal_log_path,
            "20240101:\n  lunch:\n    time: \"12:00\"\n    foods:\n      rice: 75g\n",
        )
        .expect("write should succeed");

        let out = run(Mode::Meals, &config).expect("meal mode should succeed");
        let text = fs::read_to_string(out).expect("read should succeed");
        assert!(text.starts_with("# めし\n"));
        assert!(text.contains("  - White Rice (75g): 27.9g\n"));
    }

    #[test]
    fn meal_mode_with_unknown_food_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        let config = config_in(dir.path());
        fs::write(&config.carbo_path, "id,title,amount,unit,carbo\nrice,White Rice,150,g,55.8\n")
            .expect("write should succeed");
        fs::write(
            &config.meal_log_path,
            "20240101:\n  lunch:\n    time: \"12:00\"\n    foods:\n      banana: 1本\n",
        )
        .expect("write should succeed");

        let err = run(Mode::Meals, &config).unwrap_err();
        assert!(format!("{err:#}").contains("banana"));
        assert!(!config.meal_report_path().exists());
    }

    #[test]
    fn shopping_mode_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        let config = config_in(dir.path());
        fs::write(&config.carbo_path, "id,title,amount,unit,carbo\ntofu,Tofu,100,g,1.2\n")
            .expect("write should succeed");
        fs::write(&config.shopping_list_path, "豆:\n  - tofu!\n").expect("write should succeed");

        let out = run(Mode::Shopping, &config).expect("shopping mode should succeed");
        let text = fs::read_to_string(out).expect("read should succeed");
        assert!(text.starts_with("# かいものリスト\n\n## 豆\n- <input type=\"checkbox\" name=\"chk_0_0\"> __"));
    }
}
