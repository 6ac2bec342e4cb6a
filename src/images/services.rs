use std::path::PathBuf;

/// Lookup of optional meal photos by `YYYYMMDD_slot` name.
pub trait ImageStore {
    fn exists(&self, name: &str) -> bool;
    /// Path written into the report's `<img>` tag.
    fn src(&self, name: &str) -> String;
}

/// Photos stored as `<dir>/<name>.jpg`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn file_name(name: &str) -> String {
    format!("{name}.jpg")
}

impl ImageStore for FsImageStore {
    fn exists(&self, name: &str) -> bool {
        self.dir.join(file_name(name)).is_file()
    }

    fn src(&self, name: &str) -> String {
        format!("{}/{}", self.dir.display(), file_name(name))
    }
}

/// `<img src="img/20240101_lunch.jpg" alt="20240101_lunch" width="300"/>`
pub fn img_tag(store: &dyn ImageStore, name: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" width="300"/>"#,
        store.src(name),
        name
    )
}
