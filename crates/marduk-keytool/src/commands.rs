use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use marduk_paintkey::{KeyCodec, KeyRegistry, PaintKey, RecordFormat};

use crate::cli::{Cli, Command, PaintArgs};

pub fn run(cli: Cli) -> Result<()> {
    let registry = KeyRegistry::builtin();
    let codec = KeyCodec::new(&registry);

    match cli.command {
        Command::Encode { paint, text, output } => {
            let format = if text { RecordFormat::Text } else { RecordFormat::Binary };
            encode(&codec, &paint, format, output.as_deref())
        }
        Command::Inspect { file } => {
            let bytes = read(&file)?;
            let key = codec
                .decode(&bytes)
                .with_context(|| format!("cannot decode {}", file.display()))?;
            print!("{}", describe(&key, RecordFormat::sniff(&bytes)));
            Ok(())
        }
        Command::Convert { input, output, to } => {
            let bytes = read(&input)?;
            let converted = convert(&codec, &bytes, to.into())
                .with_context(|| format!("cannot convert {}", input.display()))?;
            fs::write(&output, converted)
                .with_context(|| format!("cannot write {}", output.display()))?;
            log::info!("wrote {} record to {}", RecordFormat::from(to), output.display());
            Ok(())
        }
        Command::Tags => {
            for (tag, kind) in registry.registered_tags() {
                println!("{:08x}  {tag}  ({kind:?})", kind.tag_hash() as u32);
            }
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

fn encode(
    codec: &KeyCodec<'_>,
    paint: &PaintArgs,
    format: RecordFormat,
    output: Option<&Path>,
) -> Result<()> {
    let key = PaintKey::from_paint(&paint.to_paint()).context("cannot build a key for this paint")?;
    let record = codec.encode(&key, format)?;
    log::debug!("{}", key.id());

    match (output, format) {
        (Some(path), _) => fs::write(path, &record)
            .with_context(|| format!("cannot write {}", path.display()))?,
        (None, RecordFormat::Text) => print!("{}", String::from_utf8_lossy(&record)),
        (None, RecordFormat::Binary) => println!("{}", hex::encode(&record)),
    }
    Ok(())
}

/// Decodes a record of either format and re-encodes it as `to`.
pub fn convert(codec: &KeyCodec<'_>, record: &[u8], to: RecordFormat) -> Result<Vec<u8>> {
    let key = codec.decode(record)?;
    Ok(codec.encode(&key, to)?)
}

/// Human-readable summary printed by `inspect`.
pub fn describe(key: &PaintKey, format: RecordFormat) -> String {
    format!(
        "format: {format}\nkind:   {}\nid:     {}\nhash:   0x{:08x}\n",
        key.kind(),
        key.id(),
        key.content_hash() as u32
    )
}
