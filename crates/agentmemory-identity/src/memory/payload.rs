//! Canonical payload — the exact bytes a memory signature covers.
//!
//! Layout v1, all integers big-endian, every string prefixed by its u64
//! byte length:
//!
//! ```text
//! "AMIB" 0x01
//! key | content_hash | content_size:u64
//! memory_type | importance:u8 | tag_count:u64 { 0x00 i64 | 0x01 string }*
//! ipfs_cid: 0x00 | 0x01 string
//! vault | timestamp:u64 | key_version:u32 | agent_id | version:u32
//! ```
//!
//! Length prefixes keep adjacent fields from bleeding into each other, so
//! moving a byte from `key` into `vault` changes the payload.

use super::metadata::{MemoryMetadata, MemoryTag};
use super::signed::SignedMemory;

const MAGIC: &[u8; 4] = b"AMIB";
const LAYOUT_VERSION: u8 = 1;

const TAG_NUMBER: u8 = 0x00;
const TAG_TEXT: u8 = 0x01;
const ABSENT: u8 = 0x00;
const PRESENT: u8 = 0x01;

/// Fields covered by a memory signature.
#[derive(Debug, Clone, Copy)]
pub struct PayloadFields<'a> {
    pub key: &'a str,
    pub content_hash: &'a str,
    pub content_size: u64,
    pub metadata: &'a MemoryMetadata,
    pub vault: &'a str,
    pub timestamp: u64,
    pub key_version: u32,
    pub agent_id: &'a str,
    pub version: u32,
}

impl<'a> PayloadFields<'a> {
    /// Read the covered fields back out of a record.
    pub fn from_record(record: &'a SignedMemory) -> Self {
        Self {
            key: &record.key,
            content_hash: &record.content_hash,
            content_size: record.content_size,
            metadata: &record.metadata,
            vault: &record.vault,
            timestamp: record.signature.timestamp,
            key_version: record.signature.key_version,
            agent_id: record.signature.agent_id.as_str(),
            version: record.version,
        }
    }
}

/// Serialize the covered fields. Identical inputs give identical bytes.
pub fn canonical_payload(fields: &PayloadFields<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        128 + fields.key.len() + fields.content_hash.len() + fields.vault.len(),
    );
    out.extend_from_slice(MAGIC);
    out.push(LAYOUT_VERSION);

    put_str(&mut out, fields.key);
    put_str(&mut out, fields.content_hash);
    out.extend_from_slice(&fields.content_size.to_be_bytes());

    put_metadata(&mut out, fields.metadata);

    put_str(&mut out, fields.vault);
    out.extend_from_slice(&fields.timestamp.to_be_bytes());
    out.extend_from_slice(&fields.key_version.to_be_bytes());
    put_str(&mut out, fields.agent_id);
    out.extend_from_slice(&fields.version.to_be_bytes());
    out
}

fn put_metadata(out: &mut Vec<u8>, metadata: &MemoryMetadata) {
    put_str(out, metadata.memory_type.as_tag());
    out.push(metadata.importance);
    put_len(out, metadata.tags.len());
    for tag in &metadata.tags {
        match tag {
            MemoryTag::Number(n) => {
                out.push(TAG_NUMBER);
                out.extend_from_slice(&n.to_be_bytes());
            }
            MemoryTag::Text(s) => {
                out.push(TAG_TEXT);
                put_str(out, s);
            }
        }
    }
    match &metadata.ipfs_cid {
        Some(cid) => {
            out.push(PRESENT);
            put_str(out, cid);
        }
        None => out.push(ABSENT),
    }
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    put_len(out, s.len());
    out.extend_from_slice(s.as_bytes());
}

fn put_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&(len as u64).to_be_bytes());
}
