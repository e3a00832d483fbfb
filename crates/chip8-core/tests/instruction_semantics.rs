//! Per-instruction behaviour through the public cycle API.

use chip8_core::{
    glyph_address, CoreConfig, FaultCode, Instruction, Key, Machine, Register, RunState,
    StepOutcome, STACK_DEPTH,
};
use log as _;
use proptest as _;
use rand as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn machine_with(words: &[u16]) -> Machine {
    let mut machine = Machine::with_config(CoreConfig::seeded(0xC8));
    let image: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
    machine.load_program(&image).expect("program fits");
    machine
}

fn run(machine: &mut Machine, cycles: usize) {
    for _ in 0..cycles {
        machine.cycle().expect("cycle should not fault");
    }
}

#[rstest]
#[case::add_with_carry(0x4, 200, 100, 44, 1)]
#[case::add_overflowing_other_order(0x4, 100, 200, 44, 1)]
#[case::add_without_carry(0x4, 100, 100, 200, 0)]
#[case::sub_with_borrow(0x5, 50, 100, 206, 0)]
#[case::sub_without_borrow(0x5, 100, 50, 50, 1)]
#[case::sub_equal(0x5, 9, 9, 0, 1)]
#[case::subn_without_borrow(0x7, 50, 100, 50, 1)]
#[case::subn_with_borrow(0x7, 100, 50, 206, 0)]
#[case::shr_odd(0x6, 0x03, 0x00, 0x01, 1)]
#[case::shr_even(0x6, 0x04, 0xFF, 0x02, 0)]
#[case::shl_high_bit(0xE, 0x81, 0x00, 0x02, 1)]
#[case::shl_low_bits(0xE, 0x41, 0x00, 0x82, 0)]
fn arithmetic_sets_result_and_flag(
    #[case] sub_op: u16,
    #[case] vx: u8,
    #[case] vy: u8,
    #[case] result: u8,
    #[case] flag: u8,
) {
    let mut machine = machine_with(&[0x8120 | sub_op]);
    machine.registers.set_v(Register::V1, vx);
    machine.registers.set_v(Register::V2, vy);
    machine.registers.set_v(Register::VF, 0xAA);
    run(&mut machine, 1);
    assert_eq!(machine.registers.v(Register::V1), result);
    assert_eq!(machine.registers.flag(), flag);
}

#[rstest]
#[case::or(0x1, 0b1100, 0b1010, 0b1110)]
#[case::and(0x2, 0b1100, 0b1010, 0b1000)]
#[case::xor(0x3, 0b1100, 0b1010, 0b0110)]
#[case::copy(0x0, 0x11, 0x22, 0x22)]
fn bitwise_ops_keep_vf(#[case] sub_op: u16, #[case] vx: u8, #[case] vy: u8, #[case] result: u8) {
    let mut machine = machine_with(&[0x8340 | sub_op]);
    machine.registers.set_v(Register::V3, vx);
    machine.registers.set_v(Register::V4, vy);
    machine.registers.set_v(Register::VF, 0x5A);
    run(&mut machine, 1);
    assert_eq!(machine.registers.v(Register::V3), result);
    assert_eq!(machine.registers.flag(), 0x5A);
}

#[test]
fn add_immediate_wraps_and_leaves_vf() {
    let mut machine = machine_with(&[0x7AFF]);
    machine.registers.set_v(Register::VA, 0x02);
    run(&mut machine, 1);
    assert_eq!(machine.registers.v(Register::VA), 0x01);
    assert_eq!(machine.registers.flag(), 0);
}

#[rstest]
#[case::se_byte_hit(0x3A2A, 0x2A, 0x00, 0x204)]
#[case::se_byte_miss(0x3A2B, 0x2A, 0x00, 0x202)]
#[case::sne_byte_hit(0x4A2B, 0x2A, 0x00, 0x204)]
#[case::sne_byte_miss(0x4A2A, 0x2A, 0x00, 0x202)]
#[case::se_reg_hit(0x5AB0, 0x10, 0x10, 0x204)]
#[case::se_reg_miss(0x5AB0, 0x10, 0x11, 0x202)]
#[case::se_reg_ignores_low_nibble(0x5AB9, 0x10, 0x10, 0x204)]
#[case::sne_reg_hit(0x9AB0, 0x10, 0x11, 0x204)]
#[case::sne_reg_miss(0x9AB0, 0x10, 0x10, 0x202)]
fn conditional_skips(#[case] word: u16, #[case] va: u8, #[case] vb: u8, #[case] next_pc: u16) {
    let mut machine = machine_with(&[word]);
    machine.registers.set_v(Register::VA, va);
    machine.registers.set_v(Register::VB, vb);
    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), next_pc);
}

#[test]
fn jumps_set_pc_directly() {
    let mut machine = machine_with(&[0x1456]);
    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), 0x456);

    let mut machine = machine_with(&[0xB300]);
    machine.registers.set_v(Register::V0, 0x24);
    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), 0x324);
}

#[test]
fn call_then_return_resumes_after_the_call() {
    // 0x200: CALL 0x206, 0x202: LD V1, 0x01, 0x204: JP 0x204, 0x206: RET
    let mut machine = machine_with(&[0x2206, 0x6101, 0x1204, 0x00EE]);
    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), 0x206);
    assert_eq!(machine.stack.depth(), 1);
    assert_eq!(machine.stack.frames(), &[0x202]);

    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), 0x202);
    assert_eq!(machine.stack.depth(), 0);

    run(&mut machine, 1);
    assert_eq!(machine.registers.v(Register::V1), 1);
}

#[test]
fn seventeenth_nested_call_overflows() {
    // A subroutine that calls itself forever.
    let mut machine = machine_with(&[0x2200]);
    run(&mut machine, STACK_DEPTH);
    assert_eq!(machine.stack.depth(), STACK_DEPTH);

    assert_eq!(machine.cycle(), Err(FaultCode::StackOverflow));
    assert_eq!(machine.stack.depth(), STACK_DEPTH);
    assert_eq!(machine.registers.pc(), 0x200);
    assert_eq!(
        machine.run_state,
        RunState::FaultLatched(FaultCode::StackOverflow)
    );
}

#[test]
fn fetch_past_the_last_word_faults() {
    let mut machine = machine_with(&[]);
    machine.registers.set_pc(0xFFF);
    assert_eq!(machine.cycle(), Err(FaultCode::FetchOutOfBounds));

    let mut machine = machine_with(&[]);
    machine.registers.set_pc(0xFFE);
    let report = machine.cycle().expect("last word is fetchable");
    assert_eq!(report.instruction(), Some(Instruction::Unknown(0x0000)));
}

#[test]
fn index_loads_and_glyph_lookup() {
    let mut machine = machine_with(&[0xA123, 0xF129, 0xF21E]);
    machine.registers.set_v(Register::V1, 0x1B);
    machine.registers.set_v(Register::V2, 0x05);
    run(&mut machine, 1);
    assert_eq!(machine.registers.index(), 0x123);
    run(&mut machine, 1);
    assert_eq!(machine.registers.index(), glyph_address(0xB));
    run(&mut machine, 1);
    assert_eq!(machine.registers.index(), glyph_address(0xB) + 5);
}

#[test]
fn add_to_index_wraps_at_sixteen_bits_without_flag() {
    let mut machine = machine_with(&[0xF31E]);
    machine.registers.set_index(0xFFFF);
    machine.registers.set_v(Register::V3, 2);
    run(&mut machine, 1);
    assert_eq!(machine.registers.index(), 0x0001);
    assert_eq!(machine.registers.flag(), 0);
}

#[test]
fn bcd_stores_three_digits() {
    let mut machine = machine_with(&[0xF533]);
    machine.registers.set_v(Register::V5, 157);
    machine.registers.set_index(0x300);
    run(&mut machine, 1);
    assert_eq!(&machine.memory[0x300..0x303], &[1, 5, 7]);
    assert_eq!(machine.registers.index(), 0x300);
}

#[test]
fn bulk_store_and_load_include_vx_and_keep_index() {
    let mut machine = machine_with(&[0xF255, 0xF265]);
    machine.registers.set_index(0x400);
    machine.registers.set_v(Register::V0, 0xA0);
    machine.registers.set_v(Register::V1, 0xA1);
    machine.registers.set_v(Register::V2, 0xA2);
    machine.registers.set_v(Register::V3, 0xA3);
    run(&mut machine, 1);
    assert_eq!(&machine.memory[0x400..0x404], &[0xA0, 0xA1, 0xA2, 0x00]);
    assert_eq!(machine.registers.index(), 0x400);

    machine.memory[0x400..0x403].copy_from_slice(&[1, 2, 3]);
    run(&mut machine, 1);
    assert_eq!(&machine.registers.data()[..4], &[1, 2, 3, 0xA3]);
    assert_eq!(machine.registers.index(), 0x400);
}

#[rstest]
#[case::bcd(0xF033, 0xFFE)]
#[case::store(0xFF55, 0xFF8)]
#[case::load(0xFF65, 0xFF1)]
#[case::draw(0xD01F, 0xFF2)]
fn memory_ops_past_the_end_fault(#[case] word: u16, #[case] index: u16) {
    let mut machine = machine_with(&[word]);
    machine.registers.set_index(index);
    let before = machine.memory.clone();
    assert_eq!(machine.cycle(), Err(FaultCode::MemoryOutOfBounds));
    assert_eq!(machine.memory, before);
    assert_eq!(machine.registers.pc(), 0x200);
}

#[test]
fn drawing_twice_erases_and_reports_collision() {
    // LD I, glyph 0; DRW V0, V1, 1; DRW V0, V1, 1
    let mut machine = machine_with(&[0xA000, 0xD011, 0xD011]);
    run(&mut machine, 2);
    assert_eq!(machine.registers.flag(), 0);
    assert!(machine.framebuffer.is_set(0, 0));
    assert!(machine.framebuffer.draw_requested());

    machine.framebuffer.clear_draw_request();
    run(&mut machine, 1);
    assert_eq!(machine.registers.flag(), 1);
    assert!(!machine.framebuffer.is_set(0, 0));
    assert_eq!(machine.framebuffer.lit_count(), 0);
    assert!(machine.framebuffer.draw_requested());
}

#[test]
fn sprites_clip_at_the_screen_edges() {
    let mut machine = machine_with(&[0xD125]);
    machine.registers.set_v(Register::V1, 62);
    machine.registers.set_v(Register::V2, 30);
    machine.registers.set_index(glyph_address(0x0));
    run(&mut machine, 1);
    // Glyph 0 rows 0 and 1 (0xF0, 0x90) land on y = 30, 31; columns 62, 63.
    assert!(machine.framebuffer.is_set(62, 30));
    assert!(machine.framebuffer.is_set(63, 30));
    assert!(machine.framebuffer.is_set(62, 31));
    assert!(!machine.framebuffer.is_set(63, 31));
    assert!(!machine.framebuffer.is_set(0, 0));
    assert_eq!(machine.framebuffer.lit_count(), 3);
}

#[test]
fn clear_screen_raises_the_draw_request() {
    let mut machine = machine_with(&[0x00E0]);
    machine.framebuffer.draw_sprite(5, 5, &[0xFF]);
    machine.framebuffer.clear_draw_request();
    run(&mut machine, 1);
    assert_eq!(machine.framebuffer.lit_count(), 0);
    assert!(machine.framebuffer.draw_requested());
}

#[test]
fn key_skips_use_the_low_nibble_of_vx() {
    let mut machine = machine_with(&[0xE59E, 0x0000, 0xE5A1]);
    machine.registers.set_v(Register::V5, 0x1C);
    machine.press_key(Key::from_low_nibble(0xC));
    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), 0x204);
    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), 0x206);

    let mut machine = machine_with(&[0xE5A1]);
    machine.registers.set_v(Register::V5, 0x0C);
    run(&mut machine, 1);
    assert_eq!(machine.registers.pc(), 0x204);
}

#[test]
fn random_bytes_respect_the_mask() {
    let words = vec![0xC30F; 64];
    let mut machine = machine_with(&words);
    for _ in 0..64 {
        run(&mut machine, 1);
        assert_eq!(machine.registers.v(Register::V3) & 0xF0, 0);
    }

    let mut zeroed = machine_with(&[0xC300]);
    zeroed.registers.set_v(Register::V3, 0xFF);
    run(&mut zeroed, 1);
    assert_eq!(zeroed.registers.v(Register::V3), 0);
}

#[test]
fn seeded_random_sequences_repeat() {
    let words = vec![0xC0FF; 16];
    let sequence = |seed| {
        let mut machine = Machine::with_config(CoreConfig::seeded(seed));
        let image: Vec<u8> = words.iter().flat_map(|w: &u16| w.to_be_bytes()).collect();
        machine.load_program(&image).expect("fits");
        (0..16)
            .map(|_| {
                machine.cycle().expect("cycle");
                machine.registers.v(Register::V0)
            })
            .collect::<Vec<u8>>()
    };
    assert_eq!(sequence(1), sequence(1));
}

#[test]
fn unknown_words_still_advance_and_tick() {
    let mut machine = machine_with(&[0x8AB9, 0xE1FF, 0xF1FF]);
    machine.timers.delay = 10;
    for expected_pc in [0x202, 0x204, 0x206] {
        let report = machine.cycle().expect("no fault");
        assert!(matches!(
            report.outcome,
            StepOutcome::Executed {
                instruction: Instruction::Unknown(_),
                ..
            }
        ));
        assert_eq!(machine.registers.pc(), expected_pc);
    }
    assert_eq!(machine.timers.delay, 7);
}
