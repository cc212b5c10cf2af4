use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::process::Command;

use crate::error::Result;
use crate::utils::text::{truncate_chars, wrap_words};
use crate::utils::time;

/// Roughly three minutes of narration at typical TTS speed.
pub const MAX_SCRIPT_CHARS: usize = 2_500;
const TITLE_WRAP_COLUMNS: usize = 40;

#[async_trait]
pub trait VideoRenderer: Send + Sync {
    async fn render(&self, title: &str, script: &str, output: &Path) -> Result<()>;
}

/// Creates lesson summary videos under the media directory.
#[derive(Clone)]
pub struct VideoService {
    renderer: Arc<dyn VideoRenderer>,
    media_dir: PathBuf,
}

impl VideoService {
    pub fn new(renderer: Arc<dyn VideoRenderer>, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            media_dir: media_dir.into(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Renders the video and returns its public path, e.g. `/media/video_ab12.mp4`.
    pub async fn create(&self, title: &str, text_content: &str) -> Result<String> {
        fs::create_dir_all(&self.media_dir).await?;

        let file_name = video_file_name(title);
        let output = self.media_dir.join(&file_name);
        let script = truncate_chars(text_content, MAX_SCRIPT_CHARS);

        tracing::info!(
            title,
            script_chars = script.chars().count(),
            "Rendering lesson video to {}",
            output.display()
        );
        self.renderer.render(title, script, &output).await?;
        Ok(format!("/media/{}", file_name))
    }
}

pub fn video_file_name(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    format!("video_{}.mp4", &hex::encode(digest)[..16])
}

/// Per-render scratch files next to the final video.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScratchFiles {
    audio: PathBuf,
    title: PathBuf,
    script: PathBuf,
    video: PathBuf,
}

impl ScratchFiles {
    fn for_output(output: &Path) -> Self {
        let dir = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let base = format!("{}.{}-{:08x}", stem, time::unix_timestamp(), rand::random::<u32>());
        Self {
            audio: dir.join(format!("{}.wav", base)),
            title: dir.join(format!("{}.title.txt", base)),
            script: dir.join(format!("{}.script.txt", base)),
            video: dir.join(format!("{}.partial.mp4", base)),
        }
    }
}

/// Narrates with `espeak-ng` and composes a title card video with `ffmpeg`.
#[derive(Clone, Debug)]
pub struct FfmpegRenderer {
    ffmpeg: String,
    tts: String,
}

impl Default for FfmpegRenderer {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            tts: "espeak-ng".to_string(),
        }
    }
}

impl FfmpegRenderer {
    fn drawtext_filter(title_file: &Path) -> String {
        format!(
            "drawtext=textfile='{}':fontcolor=white:fontsize=60:line_spacing=20:x=(w-text_w)/2:y=(h-text_h)/2",
            title_file.display().to_string().replace('\'', "\\'")
        )
    }

    async fn run(program: &str, args: &[String]) -> Result<()> {
        let output = Command::new(program).args(args).output().await;
        match output {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => {
                tracing::error!("{} failed: {}", program, String::from_utf8_lossy(&out.stderr));
                Err(anyhow::anyhow!("{} exited with {}", program, out.status).into())
            }
            Err(e) => {
                tracing::error!("Failed to run {}: {}", program, e);
                Err(anyhow::anyhow!("{} not available: {}", program, e).into())
            }
        }
    }
}

#[async_trait]
impl VideoRenderer for FfmpegRenderer {
    async fn render(&self, title: &str, script: &str, output: &Path) -> Result<()> {
        let scratch = ScratchFiles::for_output(output);
        let (audio_path, title_path, script_path) =
            (&scratch.audio, &scratch.title, &scratch.script);

        fs::write(title_path, wrap_words(title, TITLE_WRAP_COLUMNS).join("\n")).await?;
        fs::write(script_path, script).await?;

        let result: Result<()> = async {
            Self::run(
                &self.tts,
                &[
                    "-w".to_string(),
                    audio_path.display().to_string(),
                    "-f".to_string(),
                    script_path.display().to_string(),
                ],
            )
            .await?;

            Self::run(
                &self.ffmpeg,
                &[
                    "-y".to_string(),
                    "-f".to_string(),
                    "lavfi".to_string(),
                    "-i".to_string(),
                    "color=c=0x1e1e1e:s=1280x720:r=24".to_string(),
                    "-i".to_string(),
                    audio_path.display().to_string(),
                    "-vf".to_string(),
                    Self::drawtext_filter(title_path),
                    "-c:v".to_string(),
                    "libx264".to_string(),
                    "-pix_fmt".to_string(),
                    "yuv420p".to_string(),
                    "-c:a".to_string(),
                    "aac".to_string(),
                    "-shortest".to_string(),
                    scratch.video.display().to_string(),
                ],
            )
            .await?;

            fs::rename(&scratch.video, output).await?;
            Ok(())
        }
        .await;

        for temp in [audio_path, title_path, script_path, &scratch.video] {
            if let Err(e) = fs::remove_file(temp).await {
                tracing::debug!("Could not remove {}: {}", temp.display(), e);
            }
        }
        result
    }
}
