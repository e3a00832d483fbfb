//! Seeded-run fingerprint generator used to compare builds across hosts.
//!
//! Runs a random-sprite program for a fixed number of cycles with a fixed
//! seed and prints a hash of the resulting machine state. Two hosts that print
//! the same value executed identically.

use chip8_core::{CoreConfig, Machine};
use log as _;
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const SEED: u64 = 0xC8C8_0001;
const CYCLES: usize = 600;

/// `RND V0, 0x3F; RND V1, 0x1F; RND V2, 0x0F; LD F, V2; DRW V0, V1, 5; JP 0x200`
const PROGRAM: [u8; 12] = [
    0xC0, 0x3F, 0xC1, 0x1F, 0xC2, 0x0F, 0xF2, 0x29, 0xD0, 0x15, 0x12, 0x00,
];

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint() -> String {
    let mut machine = Machine::with_config(CoreConfig::seeded(SEED));
    if let Err(err) = machine.load_program(&PROGRAM) {
        return format!("load failed: {err}");
    }

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for _ in 0..CYCLES {
        if let Err(fault) = machine.cycle() {
            hash_bytes(&mut hash, &[0x14, fault.as_u8()]);
            break;
        }
    }

    hash_bytes(&mut hash, &machine.registers.pc().to_le_bytes());
    hash_bytes(&mut hash, &machine.registers.index().to_le_bytes());
    hash_bytes(&mut hash, machine.registers.data());
    hash_bytes(&mut hash, &[machine.timers.delay, machine.timers.sound]);
    let cells: Vec<u8> = machine
        .framebuffer
        .cells()
        .iter()
        .map(|cell| u8::from(*cell))
        .collect();
    hash_bytes(&mut hash, &cells);
    hash_bytes(&mut hash, &machine.memory);

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
