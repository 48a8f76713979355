use std::io::{self, Read, Seek};

use num_enum::{
    TryFromPrimitive,
    IntoPrimitive,
};

use deku::prelude::*;

pub const APPLEDOUBLE_PREFIX: &[u8] = b"._";

const VERSION_1: u32 = 0x0001_0000;
const VERSION_2: u32 = 0x0002_0000;

#[derive(
    Debug,
    Copy, Clone,
    Eq, PartialEq,
    Ord, PartialOrd,
    TryFromPrimitive, IntoPrimitive,
)]
#[repr(u32)]
pub enum EntryId {
    DataFork = 1,
    ResourceFork,
    RealName,
    Comment,
    IconBW,
    IconColor,
    FileDatesInfo = 8,
    FinderInfo,
    MacintoshFileInfo,
    ProDOSFileInfo,
    MSDOSFileInfo,
    ShortName,
    AFPFileInfo,
    DirectoryID,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct EntryDescriptor {
    pub id: u32,
    pub offset: u32,
    pub length: u32,
}

impl EntryDescriptor {
    pub fn entry_id(&self) -> Option<EntryId> {
        EntryId::try_from(self.id).ok()
    }
}

/// Header of an AppleDouble sidecar, the `._name` file that carries the
/// resource fork and Finder info of `name` on foreign filesystems.
#[derive(Debug, Clone, DekuRead, DekuWrite)]
#[deku(magic = b"\x00\x05\x16\x07")]
pub struct AppleDoubleHeader {
    #[deku(endian = "big", assert = "*version == VERSION_1 || *version == VERSION_2")]
    pub version: u32,
    #[deku(pad_bytes_before = "16", update = "self.descriptors.len() as u16", endian = "big")]
    pub n_descriptors: u16,
    #[deku(count = "n_descriptors")]
    pub descriptors: Vec<EntryDescriptor>,
}

impl AppleDoubleHeader {
    pub fn new(descriptors: Vec<EntryDescriptor>) -> Self {
        Self {
            version: VERSION_2,
            n_descriptors: descriptors.len() as u16,
            descriptors,
        }
    }
    pub fn calculate_size(n_entries: u32) -> u32 {
        26 + (n_entries * 12)
    }
    pub fn read<R: Read + Seek>(mut reader: R) -> io::Result<Self> {
        let (_, header) = Self::from_reader((&mut reader, 0))?;
        Ok(header)
    }
    pub fn entry(&self, id: EntryId) -> Option<EntryDescriptor> {
        self.descriptors.iter()
            .find(|d| d.entry_id() == Some(id))
            .cloned()
    }
    pub fn resource_fork(&self) -> Option<EntryDescriptor> {
        self.entry(EntryId::ResourceFork)
    }
    pub fn finder_info(&self) -> Option<EntryDescriptor> {
        self.entry(EntryId::FinderInfo)
    }
}
