#![allow(dead_code)]

use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use nodestats::mapblock::NODE_COUNT;
use std::io::Write;

/// Filler for sections the decoder has to skip without looking at.
const FILLER: u8 = 0xAB;

/// Writes map block records the way the game stores them, for any version from 20 to 28.
pub struct MapBlockBuilder {
    version: u8,
    content: Vec<u16>,
    mapping: Vec<(u16, String)>,
    metadata: Vec<u8>,
    static_objects: Vec<Vec<u8>>,
    node_timers: u16,
}

impl MapBlockBuilder {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            content: vec![0; NODE_COUNT],
            mapping: Vec::new(),
            metadata: b"node metadata that nobody reads".to_vec(),
            static_objects: Vec::new(),
            node_timers: 0,
        }
    }

    pub fn fill(mut self, id: u16) -> Self {
        self.content = vec![id; NODE_COUNT];
        self
    }

    pub fn set(mut self, index: usize, id: u16) -> Self {
        self.content[index] = id;
        self
    }

    pub fn content(mut self, content: Vec<u16>) -> Self {
        assert_eq!(content.len(), NODE_COUNT);
        self.content = content;
        self
    }

    pub fn map(mut self, id: u16, name: &str) -> Self {
        self.mapping.push((id, name.to_string()));
        self
    }

    pub fn static_object(mut self, payload: &[u8]) -> Self {
        self.static_objects.push(payload.to_vec());
        self
    }

    pub fn node_timers(mut self, count: u16) -> Self {
        self.node_timers = count;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let version = self.version;
        let mut record = vec![version];
        let header_size = if version >= 27 {
            6
        } else if version >= 22 {
            4
        } else {
            2
        };
        record.resize(header_size, 0);

        record.extend(compress(&self.content_payload()));
        record.extend(compress(&self.metadata));

        if version <= 21 {
            record.extend([FILLER; 2]);
        }
        if version == 23 {
            record.push(FILLER);
        }
        if version == 24 {
            if self.node_timers > 0 {
                record.push(1);
                write_node_timers(&mut record, self.node_timers);
            } else {
                record.push(2);
            }
        }

        record.push(0);
        record
            .write_u16::<BigEndian>(self.static_objects.len() as u16)
            .unwrap();
        for payload in &self.static_objects {
            record.extend([FILLER; 13]);
            record.write_u16::<BigEndian>(payload.len() as u16).unwrap();
            record.extend(payload);
        }

        record.write_u32::<BigEndian>(0xFFFF_FFFF).unwrap();

        if version >= 22 {
            record.push(0);
            record
                .write_u16::<BigEndian>(self.mapping.len() as u16)
                .unwrap();
            for (id, name) in &self.mapping {
                record.write_u16::<BigEndian>(*id).unwrap();
                record.write_u16::<BigEndian>(name.len() as u16).unwrap();
                record.extend(name.as_bytes());
            }
        }

        if version >= 25 {
            record.push(10);
            write_node_timers(&mut record, self.node_timers);
        }

        record
    }

    /// param0, param1 and param2 arrays of the inflated voxel grid.
    fn content_payload(&self) -> Vec<u8> {
        if self.version >= 24 {
            let mut payload = Vec::with_capacity(NODE_COUNT * 4);
            for id in &self.content {
                payload.write_u16::<BigEndian>(*id).unwrap();
            }
            payload.resize(NODE_COUNT * 4, 0);
            return payload;
        }

        let mut param0 = vec![0u8; NODE_COUNT];
        let param1 = vec![0x0Fu8; NODE_COUNT];
        let mut param2 = vec![0u8; NODE_COUNT];
        for (index, id) in self.content.iter().enumerate() {
            if *id <= 0x80 {
                param0[index] = *id as u8;
            } else {
                assert!(
                    (0x810..=0xFFF).contains(id),
                    "id {id:#x} cannot be stored in the narrow layout"
                );
                param0[index] = (*id >> 4) as u8;
                param2[index] = ((*id & 0x0F) << 4) as u8;
            }
        }

        let mut payload = param0;
        payload.extend(param1);
        payload.extend(param2);
        payload
    }
}

fn write_node_timers(record: &mut Vec<u8>, count: u16) {
    record.write_u16::<BigEndian>(count).unwrap();
    record.extend(std::iter::repeat(FILLER).take(count as usize * 10));
}

pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
