use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;

use westwood_formats::aud::AudFile;
use westwood_formats::cps::CpsImage;
use westwood_formats::error::{Result, WestwoodError};
use westwood_formats::palette::Palette;
use westwood_formats::shp::ShpSprite;
use westwood_formats::tmp::TmpTileset;
use westwood_formats::vqa::VqaVideo;
use westwood_formats::wsa::WsaAnimation;

use crate::command::global_args::GlobalArgs;
use crate::command::{make_open_options, WestwoodCommand};

/// Decode a file and write the raw pixel/sample buffers out.
///
/// Images and sprite frames come out as 8-bit palette indices (palettes as
/// 768 bytes of 8-bit RGB), VQA frames as RGB triples, and audio as
/// little-endian signed 16-bit PCM. Encoding to PNG or WAV is a job for
/// other tools.
#[derive(Args, Debug)]
pub struct Export {
    /// The file to decode.
    file: PathBuf,
    /// Directory to write into.
    #[clap(short, long, default_value = ".")]
    output: PathBuf,
    /// Should files be overwritten?
    #[clap(long)]
    overwrite: bool,
}

impl WestwoodCommand for Export {
    fn run(self, _global_args: GlobalArgs) -> Result<()> {
        std::fs::create_dir_all(&self.output)
            .map_err(|e| WestwoodError::Io("Couldn't create output dirs".into(), e))?;

        let stem = self
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        let extension = self
            .file
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "cps" => {
                let image = CpsImage::open(&self.file)?;
                self.write(&format!("{}.raw", stem), image.pixels())?;
                if let Some(palette) = image.palette() {
                    self.write_palette(&format!("{}.pal", stem), palette)?;
                }
            }
            "shp" => {
                let sprite = ShpSprite::open(&self.file)?;
                for (i, frame) in sprite.decode_all_frames()?.iter().enumerate() {
                    self.write(&format!("{}.f{:03}.raw", stem, i), frame)?;
                }
            }
            "wsa" => {
                let anim = WsaAnimation::open(&self.file)?;
                for (i, frame) in anim.decode_all_frames()?.iter().enumerate() {
                    self.write(&format!("{}.f{:03}.raw", stem, i), frame)?;
                }
                if let Some(palette) = anim.palette() {
                    self.write_palette(&format!("{}.pal", stem), palette)?;
                }
            }
            "vqa" => {
                let video = VqaVideo::open(&self.file)?;
                for (i, frame) in video.decode_video()?.iter().enumerate() {
                    self.write(&format!("{}.f{:03}.rgb", stem, i), &frame.rgb)?;
                }
                if video.has_audio() {
                    let samples = video.decode_audio()?;
                    self.write_pcm(&format!("{}.pcm", stem), &samples)?;
                }
            }
            "aud" => {
                let aud = AudFile::open(&self.file)?;
                let samples = aud.decode()?;
                self.write_pcm(&format!("{}.pcm", stem), &samples)?;
            }
            "tmp" => {
                let tileset = TmpTileset::open(&self.file)?;
                for i in 0..tileset.tiles().len() {
                    if let Some(tile) = tileset.decode_tile(i)? {
                        self.write(&format!("{}.t{:03}.raw", stem, i), tile)?;
                    }
                }
            }
            other => {
                return Err(WestwoodError::InvalidFormat(format!(
                    "don't know how to export '.{}' files",
                    other
                )));
            }
        }
        Ok(())
    }
}

impl Export {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.output.join(name);
        log::info!("Writing {} ({} bytes)", path.display(), bytes.len());
        let mut output = open_output(&path, self.overwrite)?;
        output
            .write_all(bytes)
            .map_err(|e| WestwoodError::Io("Couldn't write output".into(), e))?;
        Ok(())
    }

    fn write_palette(&self, name: &str, palette: &Palette) -> Result<()> {
        let mut bytes = Vec::with_capacity(768);
        for color in palette.colors() {
            bytes.extend_from_slice(&[color.r, color.g, color.b]);
        }
        self.write(name, &bytes)
    }

    fn write_pcm(&self, name: &str, samples: &[i16]) -> Result<()> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        self.write(name, &bytes)
    }
}

fn open_output(path: &Path, overwrite: bool) -> Result<std::fs::File> {
    make_open_options(overwrite)
        .open(path)
        .map_err(|e| WestwoodError::Io(format!("Couldn't open {}", path.display()), e))
}
