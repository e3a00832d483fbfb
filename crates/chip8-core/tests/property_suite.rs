//! Property coverage for decoding, arithmetic and engine robustness.

use chip8_core::{
    alu, disassemble_one, validate_data_range, validate_fetch_access, AluOp, CoreConfig, Decoder,
    FaultCode, FlagUpdate, Instruction, Machine, MEMORY_BYTES, STACK_DEPTH,
};
use log as _;
use proptest::prelude::*;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

proptest! {
    #[test]
    fn decode_then_encode_is_stable(word in any::<u16>()) {
        let decoded = Decoder::decode(word);
        let reencoded = decoded.encode();
        prop_assert_eq!(Decoder::decode(reencoded), decoded);
        if decoded.is_unknown() {
            prop_assert_eq!(reencoded, word);
        }
    }

    #[test]
    fn only_register_compare_low_nibbles_are_ignored(word in any::<u16>()) {
        let decoded = Decoder::decode(word);
        let ignores_low_nibble = matches!(
            decoded,
            Instruction::SeReg { .. } | Instruction::SneReg { .. }
        );
        if ignores_low_nibble {
            prop_assert_eq!(decoded.encode(), word & 0xFFF0);
        } else {
            prop_assert_eq!(decoded.encode(), word);
        }
    }

    #[test]
    fn every_word_disassembles(word in any::<u16>()) {
        let memory = word.to_be_bytes();
        let row = disassemble_one(0, &memory).expect("two bytes available");
        prop_assert_eq!(row.raw_word, word);
        prop_assert!(!row.mnemonic.is_empty());
        prop_assert_eq!(row.is_unknown, Decoder::decode(word).is_unknown());
    }

    #[test]
    fn add_flag_matches_wide_arithmetic(vx in any::<u8>(), vy in any::<u8>()) {
        let (sum, flag) = alu(AluOp::Add, vx, vy);
        let wide = u16::from(vx) + u16::from(vy);
        prop_assert_eq!(u16::from(sum), wide & 0xFF);
        prop_assert_eq!(flag, FlagUpdate::Set(wide > 0xFF));
    }

    #[test]
    fn sub_flag_is_no_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        let (diff, flag) = alu(AluOp::Sub, vx, vy);
        prop_assert_eq!(diff, vx.wrapping_sub(vy));
        prop_assert_eq!(flag, FlagUpdate::Set(vx >= vy));
    }

    #[test]
    fn fetch_bounds_match_address_space(pc in any::<u16>()) {
        let fetch = validate_fetch_access(pc);
        if usize::from(pc) + 2 <= MEMORY_BYTES {
            prop_assert!(fetch.is_ok());
        } else {
            prop_assert_eq!(fetch, Err(FaultCode::FetchOutOfBounds));
        }
    }

    #[test]
    fn data_ranges_never_leave_memory(start in any::<u16>(), len in 0usize..32) {
        match validate_data_range(start, len) {
            Ok(range) => {
                prop_assert!(range.end <= MEMORY_BYTES);
                prop_assert_eq!(range.len(), len);
            }
            Err(fault) => {
                prop_assert_eq!(fault, FaultCode::MemoryOutOfBounds);
                prop_assert!(usize::from(start) + len > MEMORY_BYTES);
            }
        }
    }

    #[test]
    fn arbitrary_programs_never_panic(
        program in proptest::collection::vec(any::<u8>(), 0..256),
        seed in any::<u64>(),
    ) {
        let mut machine = Machine::with_config(CoreConfig::seeded(seed));
        machine.load_program(&program).expect("small programs fit");
        for _ in 0..200 {
            match machine.cycle() {
                Ok(_) => {}
                Err(fault) => {
                    prop_assert_eq!(machine.latched_fault(), Some(fault));
                    prop_assert_eq!(machine.cycle(), Err(fault));
                    break;
                }
            }
            if machine.run_state.awaiting_register().is_some() {
                let pc = machine.registers.pc();
                prop_assert!(machine.cycle().is_ok());
                prop_assert_eq!(machine.registers.pc(), pc);
                break;
            }
        }
        prop_assert!(machine.stack.depth() <= STACK_DEPTH);
    }
}
