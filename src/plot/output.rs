use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use log::info;

use super::Result;

// ---------------------------------------------------------------------------
// Render target resolution
// ---------------------------------------------------------------------------

/// Where a chart is rendered. The bitmap backend always needs a concrete
/// file path, so the "display" case renders into a temp file which is then
/// handed to the platform viewer.
pub(crate) struct RenderTarget {
    pub path: PathBuf,
    display_after: bool,
}

/// Resolve a caller-supplied output path into a [`RenderTarget`]. No path
/// means "render to a temp file and show it".
pub(crate) fn resolve(output: Option<&Path>) -> RenderTarget {
    match output {
        Some(path) => RenderTarget {
            path: path.to_path_buf(),
            display_after: false,
        },
        None => {
            static COUNTER: AtomicU64 = AtomicU64::new(0);
            let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
            RenderTarget {
                path: std::env::temp_dir().join(format!(
                    "quiescat-chart-{}-{seq}.png",
                    std::process::id()
                )),
                display_after: true,
            }
        }
    }
}

/// Finish a rendered chart: log the saved file, or hand it to the system
/// image viewer (non-blocking). Returns the written path.
pub(crate) fn finish(target: RenderTarget) -> Result<PathBuf> {
    if target.display_after {
        show_file(&target.path)?;
    } else {
        info!("Saved figure to {}", target.path.display());
    }
    Ok(target.path)
}

/// Open the rendered image with the platform viewer.
fn show_file(path: &Path) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = Command::new("xdg-open");

    command.arg(path).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_used_verbatim() {
        let path = Path::new("/tmp/chart.png");
        let target = resolve(Some(path));
        assert_eq!(target.path, path);
        assert!(!target.display_after);
    }

    #[test]
    fn missing_path_gets_a_unique_temp_file() {
        let a = resolve(None);
        let b = resolve(None);
        assert!(a.display_after);
        assert_ne!(a.path, b.path);
        assert!(a.path.starts_with(std::env::temp_dir()));
    }
}
