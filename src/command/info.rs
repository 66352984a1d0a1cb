use std::path::{Path, PathBuf};

use clap::Args;
use owo_colors::Style;

use westwood_formats::aud::AudFile;
use westwood_formats::console::ErrStyle;
use westwood_formats::cps::CpsImage;
use westwood_formats::error::{Result, WestwoodError};
use westwood_formats::mix::MixArchive;
use westwood_formats::shp::ShpSprite;
use westwood_formats::tmp::TmpTileset;
use westwood_formats::vqa::VqaVideo;
use westwood_formats::wsa::WsaAnimation;

use crate::command::global_args::GlobalArgs;
use crate::command::WestwoodCommand;

/// Show metadata for asset files.
#[derive(Args, Debug)]
pub struct Info {
    /// The files to inspect.
    files: Vec<PathBuf>,
}

impl WestwoodCommand for Info {
    fn run(mut self, _global_args: GlobalArgs) -> Result<()> {
        self.files.sort();
        for file in &self.files {
            print_info(file)?;
        }
        Ok(())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn print_info(path: &Path) -> Result<()> {
    let path_display = path.display();
    let styled_path = path_display.errstyle(Style::new().green());
    match extension_of(path).as_str() {
        "mix" | "big" | "dat" => {
            let archive = MixArchive::open(path)?;
            let info = archive.info();
            println!("{}: {} archive", styled_path, info.format);
            println!("  Game:       {}", info.game.display_name());
            println!("  Files:      {}", info.file_count);
            println!("  Size:       {} bytes", info.file_size);
            println!("  Encrypted:  {}", if info.encrypted { "yes" } else { "no" });
            println!("  Checksum:   {}", if info.has_checksum { "yes" } else { "no" });
            println!("  Body at:    {:#X}", info.body_offset);
        }
        "cps" => {
            let image = CpsImage::open(path)?;
            println!("{}: CPS image", styled_path);
            println!("  Size:       {}x{}", image.width(), image.height());
            println!(
                "  Compressed: {}",
                if image.header().compression == 4 { "LCW" } else { "no" }
            );
            println!(
                "  Palette:    {}",
                if image.palette().is_some() { "embedded" } else { "none" }
            );
        }
        "shp" => {
            let sprite = ShpSprite::open(path)?;
            let header = sprite.header();
            println!("{}: SHP sprite", styled_path);
            println!("  Frames:     {}", header.frame_count);
            println!("  Size:       {}x{}", header.max_width, header.max_height);
            println!("  Delta size: {}", header.delta_buffer_size);
        }
        "wsa" => {
            let anim = WsaAnimation::open(path)?;
            let header = anim.header();
            println!("{}: WSA animation", styled_path);
            println!("  Frames:     {}", header.frame_count);
            println!("  Size:       {}x{}", header.width, header.height);
            println!("  Looping:    {}", if anim.looping() { "yes" } else { "no" });
            println!(
                "  Palette:    {}",
                if anim.palette().is_some() { "embedded" } else { "none" }
            );
        }
        "vqa" => {
            let video = VqaVideo::open(path)?;
            let header = video.header();
            println!("{}: VQA video", styled_path);
            println!("  Version:    {}", header.version);
            println!("  Frames:     {}", header.frame_count);
            println!("  Size:       {}x{}", header.width, header.height);
            println!("  Blocks:     {}x{}", header.block_w, header.block_h);
            println!("  Rate:       {} fps", header.frame_rate);
            println!("  Duration:   {:.2}s", video.duration_seconds());
            println!("  Hicolor:    {}", if video.is_hicolor() { "yes" } else { "no" });
            let audio = video.audio_info();
            match audio.codec {
                Some(codec) => println!(
                    "  Audio:      {:?}, {} Hz, {} ch, {} bit",
                    codec, audio.sample_rate, audio.channels, audio.bits
                ),
                None => println!("  Audio:      none"),
            }
        }
        "aud" => {
            let aud = AudFile::open(path)?;
            println!("{}: AUD audio", styled_path);
            println!("  Codec:      {:?}", aud.codec());
            println!("  Rate:       {} Hz", aud.header().sample_rate);
            println!("  Channels:   {}", aud.channels());
            println!("  Bits:       {}", aud.bits());
            println!("  Samples:    {}", aud.sample_count());
            println!("  Duration:   {:.2}s", aud.duration_seconds());
        }
        "tmp" => {
            let tileset = TmpTileset::open(path)?;
            let header = tileset.header();
            println!("{}: TMP tileset ({:?})", styled_path, tileset.format());
            println!("  Tiles:      {} ({} used)", header.tile_count, tileset.valid_tile_count());
            println!("  Tile size:  {}x{}", header.tile_width, header.tile_height);
        }
        other => {
            return Err(WestwoodError::InvalidFormat(format!(
                "don't know how to inspect '.{}' files",
                other
            )));
        }
    }
    Ok(())
}
