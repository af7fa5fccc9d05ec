use std::io::Cursor;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use promptedit_contracts::tools::FilterOptions;

use crate::{sha256_hex, FilterEditor, LoadedImage};

/// In-process stand-in for the canvas editor.
///
/// Decodes the image so dimensions are real, keeps the active filter stack
/// in application order, and exports the decoded pixels untouched.
#[derive(Debug, Default)]
pub struct DryrunEditor {
    state: Mutex<DryrunState>,
}

#[derive(Debug, Default)]
struct DryrunState {
    image: Option<DynamicImage>,
    image_name: Option<String>,
    filters: Vec<(String, FilterOptions)>,
    ui_size: Option<(u32, u32)>,
    active_menu: Option<String>,
}

impl DryrunEditor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, DryrunState>> {
        self.state
            .lock()
            .map_err(|_| anyhow::anyhow!("dryrun editor lock poisoned"))
    }

    pub fn active_filters(&self) -> Vec<(String, FilterOptions)> {
        self.state()
            .map(|state| state.filters.clone())
            .unwrap_or_default()
    }

    pub fn filter_options(&self, filter: &str) -> Option<FilterOptions> {
        self.state().ok().and_then(|state| {
            state
                .filters
                .iter()
                .find(|(name, _)| name == filter)
                .map(|(_, options)| options.clone())
        })
    }

    pub fn image_name(&self) -> Option<String> {
        self.state().ok().and_then(|state| state.image_name.clone())
    }

    pub fn ui_size(&self) -> Option<(u32, u32)> {
        self.state().ok().and_then(|state| state.ui_size)
    }

    pub fn active_menu(&self) -> Option<String> {
        self.state().ok().and_then(|state| state.active_menu.clone())
    }
}

impl FilterEditor for DryrunEditor {
    fn name(&self) -> &str {
        "dryrun"
    }

    fn load_image(&self, path: &Path) -> Result<LoadedImage> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
        let decoded = image::load_from_memory(&bytes)
            .with_context(|| format!("failed decoding {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|value| value.to_str())
            .unwrap_or("image")
            .to_string();
        let loaded = LoadedImage {
            name: name.clone(),
            width: decoded.width(),
            height: decoded.height(),
            sha256: sha256_hex(&bytes),
        };

        let mut state = self.state()?;
        state.image = Some(decoded);
        state.image_name = Some(name);
        state.filters.clear();
        Ok(loaded)
    }

    fn apply_filter(&self, filter: &str, options: &FilterOptions) -> Result<()> {
        let mut state = self.state()?;
        if state.image.is_none() {
            bail!("cannot apply {filter}: no image loaded");
        }
        match state.filters.iter_mut().find(|(name, _)| name == filter) {
            Some((_, existing)) => *existing = options.clone(),
            None => state.filters.push((filter.to_string(), options.clone())),
        }
        Ok(())
    }

    fn remove_filter(&self, filter: &str) -> Result<()> {
        let mut state = self.state()?;
        state.filters.retain(|(name, _)| name != filter);
        Ok(())
    }

    fn to_data_url(&self) -> Result<String> {
        let state = self.state()?;
        let Some(image) = state.image.as_ref() else {
            bail!("cannot export: no image loaded");
        };
        let mut bytes: Vec<u8> = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("failed encoding PNG")?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
    }

    fn resize_ui(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            bail!("invalid UI size {width}x{height}");
        }
        self.state()?.ui_size = Some((width, height));
        Ok(())
    }

    fn activate_menu(&self, menu: &str) -> Result<()> {
        let menu = menu.trim();
        if menu.is_empty() {
            bail!("menu name is empty");
        }
        self.state()?.active_menu = Some(menu.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use serde_json::json;

    use super::DryrunEditor;
    use crate::{decode_data_url, FilterEditor};

    fn write_png(dir: &std::path::Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut image = RgbImage::new(width, height);
        for pixel in image.pixels_mut() {
            *pixel = Rgb([200, 120, 40]);
        }
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn load_reports_dimensions_and_digest() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = write_png(temp.path(), "photo.png", 6, 4);
        let editor = DryrunEditor::new();
        let loaded = editor.load_image(&path)?;
        assert_eq!(loaded.name, "photo.png");
        assert_eq!((loaded.width, loaded.height), (6, 4));
        assert_eq!(loaded.sha256.len(), 64);
        assert_eq!(editor.image_name().as_deref(), Some("photo.png"));
        Ok(())
    }

    #[test]
    fn load_rejects_missing_and_non_image_files() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let editor = DryrunEditor::new();
        assert!(editor.load_image(&temp.path().join("missing.png")).is_err());
        let text = temp.path().join("notes.png");
        std::fs::write(&text, "not an image")?;
        assert!(editor.load_image(&text).is_err());
        Ok(())
    }

    #[test]
    fn filters_replace_in_place_and_remove() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = write_png(temp.path(), "photo.png", 2, 2);
        let editor = DryrunEditor::new();
        assert!(editor
            .apply_filter("blur", &serde_json::Map::new())
            .is_err());

        editor.load_image(&path)?;
        let options = |value: f64| json!({ "blur": value }).as_object().cloned().unwrap();
        editor.apply_filter("blur", &options(0.2))?;
        editor.apply_filter("sepia", &serde_json::Map::new())?;
        editor.apply_filter("blur", &options(0.6))?;
        let names: Vec<String> = editor
            .active_filters()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["blur", "sepia"]);
        assert_eq!(editor.filter_options("blur").unwrap()["blur"], json!(0.6));

        editor.remove_filter("blur")?;
        assert!(editor.filter_options("blur").is_none());
        Ok(())
    }

    #[test]
    fn export_round_trips_through_data_url() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = write_png(temp.path(), "photo.png", 3, 5);
        let editor = DryrunEditor::new();
        assert!(editor.to_data_url().is_err());
        editor.load_image(&path)?;

        let url = editor.to_data_url()?;
        assert!(url.starts_with("data:image/png;base64,"));
        let bytes = decode_data_url(&url)?;
        let decoded = image::load_from_memory(&bytes)?;
        assert_eq!((decoded.width(), decoded.height()), (3, 5));
        Ok(())
    }

    #[test]
    fn ui_size_and_menu_validation() -> anyhow::Result<()> {
        let editor = DryrunEditor::new();
        assert!(editor.resize_ui(0, 720).is_err());
        editor.resize_ui(1024, 720)?;
        assert_eq!(editor.ui_size(), Some((1024, 720)));

        assert!(editor.activate_menu("  ").is_err());
        editor.activate_menu("filter")?;
        assert_eq!(editor.active_menu().as_deref(), Some("filter"));
        Ok(())
    }
}
