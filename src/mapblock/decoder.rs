use std::collections::HashMap;

use crate::error::{DecodeError, DecodeResult};
use crate::mapblock::content::{read_content_id, required_payload_len};
use crate::mapblock::cursor::BlockCursor;
use crate::mapblock::layout::{self, Section};
use crate::mapblock::zlib;

/// Content ids reserved for air and ignore before blocks carried their own mapping table.
pub const LEGACY_AIR_ID: u16 = 126;
pub const LEGACY_IGNORE_ID: u16 = 127;

const NODE_TIMER_SIZE: usize = 10;
const STATIC_OBJECT_HEAD_SIZE: usize = 13;

/// A map block with its voxel grid inflated and its id-to-name table recovered.
///
/// Content ids only mean something together with the name map of the same block.
#[derive(Debug, Clone)]
pub struct DecodedChunk {
    version: u8,
    content: Vec<u8>,
    name_map: HashMap<u16, String>,
    air_id: Option<u16>,
    ignore_id: Option<u16>,
}

impl DecodedChunk {
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Content id to node name. Never contains the air or ignore id.
    pub fn name_map(&self) -> &HashMap<u16, String> {
        &self.name_map
    }

    pub fn air_id(&self) -> Option<u16> {
        self.air_id
    }

    pub fn ignore_id(&self) -> Option<u16> {
        self.ignore_id
    }

    /// True if `id` is air or ignore and should not be counted.
    pub fn is_reserved(&self, id: u16) -> bool {
        self.air_id == Some(id) || self.ignore_id == Some(id)
    }

    /// Content id stored at a linear node index (`x + 16 * y + 256 * z`).
    ///
    /// # Panics
    /// If `index` is not below 4096.
    pub fn content_id(&self, index: usize) -> u16 {
        read_content_id(&self.content, self.version, index)
    }
}

/// Decodes one map block record.
///
/// The record is walked front to back: version byte, header, the voxel content stream, the
/// node metadata stream, then the version-dependent trailing sections from
/// [`layout::TRAILING_SECTIONS`]. Anything after the last section is ignored.
pub fn decode(data: &[u8]) -> DecodeResult<DecodedChunk> {
    let mut cursor = BlockCursor::new(data);

    let version = cursor.read_u8("version")?;
    let header_size =
        layout::header_size(version).ok_or(DecodeError::UnsupportedFormat { version })?;
    cursor.seek(header_size, "header")?;

    let (content, end) = zlib::decompress(data, cursor.position())?;
    let required = required_payload_len(version);
    if content.len() < required {
        return Err(DecodeError::TruncatedData {
            context: "voxel content",
            offset: 0,
            needed: required,
            available: content.len(),
        });
    }
    cursor.seek(end, "voxel content stream")?;

    // Node metadata is not needed, but it has to be inflated to find where it ends.
    let (_, end) = zlib::decompress(data, cursor.position())?;
    cursor.seek(end, "node metadata stream")?;

    let mut chunk = DecodedChunk {
        version,
        content,
        name_map: HashMap::new(),
        air_id: None,
        ignore_id: None,
    };
    if !layout::sections(version).any(|section| section == Section::NameIdMapping) {
        chunk.air_id = Some(LEGACY_AIR_ID);
        chunk.ignore_id = Some(LEGACY_IGNORE_ID);
    }

    for section in layout::sections(version) {
        match section {
            Section::Skip { bytes, context } => cursor.skip(bytes, context)?,
            Section::LegacyNodeTimers => read_legacy_node_timers(&mut cursor)?,
            Section::StaticObjects => read_static_objects(&mut cursor)?,
            Section::NameIdMapping => read_name_id_mapping(&mut cursor, &mut chunk)?,
            Section::NodeTimers => {
                cursor.skip(1, "node timer version")?;
                skip_node_timers(&mut cursor)?;
            }
        }
    }

    Ok(chunk)
}

fn skip_node_timers(cursor: &mut BlockCursor<'_>) -> DecodeResult<()> {
    let count = cursor.read_u16("node timer count")? as usize;
    cursor.skip(count * NODE_TIMER_SIZE, "node timers")
}

fn read_legacy_node_timers(cursor: &mut BlockCursor<'_>) -> DecodeResult<()> {
    let content_width = cursor.read_u8("content width")?;
    if content_width == 1 {
        skip_node_timers(cursor)?;
    }
    Ok(())
}

fn read_static_objects(cursor: &mut BlockCursor<'_>) -> DecodeResult<()> {
    cursor.skip(1, "static object version")?;
    let count = cursor.read_u16("static object count")?;
    for _ in 0..count {
        cursor.skip(STATIC_OBJECT_HEAD_SIZE, "static object head")?;
        let data_size = cursor.read_u16("static object data size")? as usize;
        cursor.skip(data_size, "static object data")?;
    }
    Ok(())
}

fn read_name_id_mapping(cursor: &mut BlockCursor<'_>, chunk: &mut DecodedChunk) -> DecodeResult<()> {
    cursor.skip(1, "name-id mapping version")?;
    let count = cursor.read_u16("name-id mapping count")?;
    for _ in 0..count {
        let id = cursor.read_u16("name-id mapping id")?;
        let name_len = cursor.read_u16("name-id mapping name length")? as usize;
        let name = String::from_utf8_lossy(cursor.read_bytes(name_len, "name-id mapping name")?);

        match &*name {
            "air" => chunk.air_id = Some(id),
            "ignore" => chunk.ignore_id = Some(id),
            _ => {
                chunk.name_map.insert(id, name.into_owned());
            }
        }
    }

    // A table can reuse the air or ignore id for another name; the reserved meaning wins.
    for reserved in [chunk.air_id, chunk.ignore_id].into_iter().flatten() {
        chunk.name_map.remove(&reserved);
    }
    Ok(())
}
