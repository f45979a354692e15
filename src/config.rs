use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug, Default)]
#[command(about = "Paint a 10x10 tile grid with neighbor-weighted random colors")]
pub(crate) struct Args {
    /// weight for each neighbor's color
    #[arg(long)]
    pub(crate) x: Option<f64>,

    /// combined weight when the up and left neighbors agree
    #[arg(long)]
    pub(crate) y: Option<f64>,

    /// color once with --x/--y, print the grid and exit
    #[arg(long)]
    pub(crate) print: bool,

    /// fixed RNG seed
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// frame cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// print palette indices instead of colored blocks
    #[arg(long)]
    pub(crate) no_color: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) enable_mouse: bool,
    /// None draws a fresh seed from the OS every run.
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            enable_mouse: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Command-line flags win over the saved file.
    pub(crate) fn apply_args(&mut self, args: &Args) {
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if args.no_color {
            self.enable_color = false;
        }
    }

    pub(crate) fn fps(&self) -> u32 {
        self.fps_cap.clamp(10, 240)
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "tilepaint", "Tilepaint")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("tilepaint.log"),
    })
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<Settings>(&s) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("ignoring malformed {}: {e}", path.display());
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("renaming to {}", to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tilepaint-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let path = scratch("absent.json");
        assert_eq!(load_settings(&path), Settings::default());

        let path = scratch("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let path = scratch("settings.json");
        let s = Settings {
            fps_cap: 60,
            enable_color: false,
            enable_mouse: false,
            seed: Some(1234),
        };
        save_settings_atomic(&path, &s).unwrap();
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn args_override_settings() {
        let args = Args::parse_from(["tilepaint", "--seed", "9", "--fps", "500", "--no-color"]);
        let mut s = Settings::default();
        s.apply_args(&args);
        assert_eq!(s.seed, Some(9));
        assert!(!s.enable_color);
        assert_eq!(s.fps(), 240);
        assert!(s.enable_mouse);
    }

    #[test]
    fn parses_weights() {
        let args = Args::parse_from(["tilepaint", "--x", "12.5", "--y", "40", "--print"]);
        assert_eq!(args.x, Some(12.5));
        assert_eq!(args.y, Some(40.0));
        assert!(args.print);
    }
}
