//! Port Transaction Unit Tests.
//!
//! Verifies byte mask bit order and the split of the data port into its
//! read and write halves.

use rstest::rstest;
use vsim_harness::common::{ByteMask, DataRequest, ReadRequest};

// ══════════════════════════════════════════════════════════
// 1. Byte masks
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(&[0x01], 0, true)]
#[case(&[0x01], 1, false)]
#[case(&[0x80], 7, true)]
#[case(&[0x00, 0x01], 8, true)]
#[case(&[0xFF, 0x7F], 15, false)]
#[case(&[0xFF], 8, false)]
fn byte_mask_lane(#[case] bits: &[u8], #[case] lane: usize, #[case] enabled: bool) {
    assert_eq!(ByteMask::new(bits).is_enabled(lane), enabled);
}

#[test]
fn byte_mask_exposes_raw_bits() {
    let bits = [0xA5, 0x5A];
    assert_eq!(ByteMask::new(&bits).bits(), &bits);
}

// ══════════════════════════════════════════════════════════
// 2. Data port split
// ══════════════════════════════════════════════════════════

#[test]
fn idle_data_request_is_neither_read_nor_write() {
    let idle = DataRequest::idle();
    assert!(!idle.as_read().valid);
    assert!(!idle.as_write().valid);
}

#[test]
fn invalid_write_is_not_a_read() {
    let data = [0u8; 4];
    let be = [0x0F];
    let req = DataRequest {
        addr: 0x100,
        valid: false,
        write: true,
        data: &data,
        byte_enable: ByteMask::new(&be),
    };
    assert_eq!(req.as_read(), ReadRequest::new(0x100, false));
    assert!(!req.as_write().valid);
    assert_eq!(req.as_write().data, &data);
}
