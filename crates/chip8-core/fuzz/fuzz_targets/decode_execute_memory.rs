#![no_main]

use chip8_core::{
    disassemble_one, validate_data_range, validate_fetch_access, CoreConfig, Decoder, Machine,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let word = u16::from_be_bytes([data[0], data[1]]);
    let addr = u16::from_be_bytes([data[2], data[3]]);

    let decoded = Decoder::decode(word);
    assert_eq!(Decoder::decode(decoded.encode()), decoded);
    let _ = disassemble_one(0, &data[..2]);

    let mut machine = Machine::with_config(CoreConfig::seeded(u64::from(addr)));
    if machine.load_program(&data[4..]).is_err() {
        return;
    }
    machine.registers.set_index(addr);
    for _ in 0..64 {
        if machine.cycle().is_err() {
            break;
        }
    }

    let _ = validate_fetch_access(addr);
    let _ = validate_data_range(addr, usize::from(data[0]));
});
