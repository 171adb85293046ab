//! Region patches for the boot header.
//!
//! The boot header spans the first sectors of the data track. Its area-symbol
//! field sits in sector 0 and its area-code group in sector 1, so those are
//! the only sectors a region patch ever touches.

use ode_core::PatchRegion;

use crate::SECTOR_SIZE;

/// Sector addresses that carry region data.
pub const PATCHABLE_SECTORS: [u32; 2] = [0, 1];

/// Area symbols in the boot header (sector 0).
const AREA_SYMBOLS_OFFSET: usize = 0x40;
const AREA_SYMBOLS_LEN: usize = 10;

/// Area-code group at boot header offset 0xE00, i.e. inside sector 1.
const AREA_GROUP_OFFSET: usize = 0xE00 - SECTOR_SIZE;
const AREA_ENTRY_LEN: usize = 0x20;
const AREA_ENTRY_MARKER: [u8; 4] = [0xA0, 0x0E, 0x00, 0x09];

/// In-place sector transform applied before a sector is transmitted.
pub trait SectorPatch: Send + Sync {
    /// Patch `buf`, the sector at `lba`, for `region`. Addresses that carry
    /// no region data are left untouched.
    fn apply(&self, buf: &mut [u8], lba: u32, region: PatchRegion);
}

/// Rewrites the boot header's area symbols and first area-code entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaCodePatch;

impl SectorPatch for AreaCodePatch {
    fn apply(&self, buf: &mut [u8], lba: u32, region: PatchRegion) {
        match lba {
            0 => patch_area_symbols(buf, region),
            1 => patch_area_group(buf, region),
            _ => {}
        }
    }
}

/// Replace the area-symbol field with the single region symbol.
pub fn patch_area_symbols(buf: &mut [u8], region: PatchRegion) {
    let Some(field) = buf.get_mut(AREA_SYMBOLS_OFFSET..AREA_SYMBOLS_OFFSET + AREA_SYMBOLS_LEN)
    else {
        return;
    };
    field.fill(b' ');
    field[0] = region.symbol();
}

/// Replace the first area-code entry with the region's label.
pub fn patch_area_group(buf: &mut [u8], region: PatchRegion) {
    let Some(entry) = buf.get_mut(AREA_GROUP_OFFSET..AREA_GROUP_OFFSET + AREA_ENTRY_LEN) else {
        return;
    };
    entry.fill(b' ');
    entry[..AREA_ENTRY_MARKER.len()].copy_from_slice(&AREA_ENTRY_MARKER);
    let label = region.area_label().as_bytes();
    let room = AREA_ENTRY_LEN - AREA_ENTRY_MARKER.len();
    let len = label.len().min(room);
    entry[AREA_ENTRY_MARKER.len()..AREA_ENTRY_MARKER.len() + len].copy_from_slice(&label[..len]);
}
