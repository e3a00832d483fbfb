//! CLI entry point for the headless CHIP-8 runner.

use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use chip8_core::{
    disassemble_window, CoreConfig, Driver, DriverConfig, HostEvent, KeyLayout, Machine, TIMER_HZ,
};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: chip8-run <rom> [options]

Loads a CHIP-8 program at 0x200, runs it for a number of frames and prints
the final framebuffer ('#' lit, '.' unlit) followed by a status line.

Options:
  --frames <n>              Frames to run (default 60)
  --cycles-per-frame <n>    Instructions per frame (default 1)
  --seed <n>                Seed for the random-number instruction
  --keymap <layout>         Host key layout: original (default) or conventional
  --press <key>@<frame>     Press a host key before the given frame
  --release <key>@<frame>   Release a host key before the given frame
  --realtime                Pace frames at 60 Hz instead of running flat out
  --disasm <n>              Print <n> instructions either side of the final pc
  -h, --help                Show this help message

Host keys are single characters from the selected layout, or P (pause)
and Escape (quit).

Examples:
  chip8-run pong.ch8 --frames 600 --seed 1
  chip8-run maze.ch8 --press 5@10 --release 5@12 --disasm 4
";

const DEFAULT_FRAMES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyAction {
    Press,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptedKey {
    frame: u32,
    action: KeyAction,
    name: String,
}

impl ScriptedKey {
    fn to_event(&self) -> HostEvent {
        match self.action {
            KeyAction::Press => HostEvent::KeyDown(self.name.clone()),
            KeyAction::Release => HostEvent::KeyUp(self.name.clone()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    rom: PathBuf,
    frames: u32,
    cycles_per_frame: u32,
    seed: Option<u64>,
    layout: KeyLayout,
    keys: Vec<ScriptedKey>,
    realtime: bool,
    disasm: Option<usize>,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<OsString>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    let text = value.to_string_lossy();
    text.parse()
        .map_err(|_| format!("invalid value for {flag}: {text}"))
}

fn parse_scripted_key(
    flag: &str,
    action: KeyAction,
    value: Option<OsString>,
) -> Result<ScriptedKey, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    let text = value.to_string_lossy();
    let (name, frame) = text
        .rsplit_once('@')
        .ok_or_else(|| format!("expected <key>@<frame> for {flag}: {text}"))?;
    if name.is_empty() {
        return Err(format!("missing key name for {flag}: {text}"));
    }
    let frame = frame
        .parse()
        .map_err(|_| format!("invalid frame for {flag}: {text}"))?;
    Ok(ScriptedKey {
        frame,
        action,
        name: name.to_string(),
    })
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut rom: Option<PathBuf> = None;
    let mut frames = DEFAULT_FRAMES;
    let mut cycles_per_frame = DriverConfig::default().cycles_per_frame;
    let mut seed = None;
    let mut layout = KeyLayout::default();
    let mut keys = Vec::new();
    let mut realtime = false;
    let mut disasm = None;

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().to_string();
        match flag.as_str() {
            "--help" | "-h" => return Ok(ParseResult::Help),
            "--frames" => frames = parse_number(&flag, args.next())?,
            "--cycles-per-frame" => {
                cycles_per_frame = parse_number(&flag, args.next())?;
                if cycles_per_frame == 0 {
                    return Err("--cycles-per-frame must be at least 1".to_string());
                }
            }
            "--seed" => seed = Some(parse_number(&flag, args.next())?),
            "--keymap" => {
                let name: String = parse_number(&flag, args.next())?;
                layout = KeyLayout::from_name(&name)
                    .ok_or_else(|| format!("unknown keymap: {name}"))?;
            }
            "--press" => keys.push(parse_scripted_key(&flag, KeyAction::Press, args.next())?),
            "--release" => keys.push(parse_scripted_key(&flag, KeyAction::Release, args.next())?),
            "--realtime" => realtime = true,
            "--disasm" => disasm = Some(parse_number(&flag, args.next())?),
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            _ => {
                if rom.is_some() {
                    return Err("multiple ROM paths provided".to_string());
                }
                rom = Some(PathBuf::from(arg));
            }
        }
    }

    let rom = rom.ok_or_else(|| "missing ROM path".to_string())?;
    keys.sort_by_key(|key| key.frame);
    Ok(ParseResult::Run(RunArgs {
        rom,
        frames,
        cycles_per_frame,
        seed,
        layout,
        keys,
        realtime,
        disasm,
    }))
}

fn load_machine(args: &RunArgs) -> Result<Machine, i32> {
    let file = File::open(&args.rom).map_err(|e| {
        eprintln!("error: cannot open {}: {e}", args.rom.display());
        1
    })?;
    let mut machine = Machine::with_config(CoreConfig {
        rng_seed: args.seed,
    });
    let len = machine.load_program_from(file).map_err(|e| {
        eprintln!("error: {}: {e}", args.rom.display());
        1
    })?;
    log::info!("loaded {} ({len} bytes)", args.rom.display());
    Ok(machine)
}

fn print_disassembly(driver: &Driver, radius: usize) {
    let machine = driver.machine();
    let pc = machine.registers.pc();
    for row in disassemble_window(pc, radius, radius, &machine.memory) {
        let marker = if row.addr_start == pc { '>' } else { ' ' };
        println!("{marker} {row}");
    }
}

fn run(args: &RunArgs) -> Result<(), i32> {
    let machine = load_machine(args)?;
    let mut driver = Driver::new(
        machine,
        DriverConfig {
            cycles_per_frame: args.cycles_per_frame,
            layout: args.layout,
        },
    );

    let frame_period = Duration::from_secs(1) / TIMER_HZ;
    let mut pending = args.keys.iter().peekable();
    let mut fault = None;

    for frame in 0..args.frames {
        while let Some(key) = pending.next_if(|key| key.frame <= frame) {
            driver.handle_event(key.to_event());
        }
        if driver.is_stopped() {
            log::info!("stopped at frame {frame}");
            break;
        }

        let started = Instant::now();
        let report = driver.tick(started);
        if report.sound {
            eprintln!("beep (frame {frame})");
        }
        if let Some(cause) = report.fault {
            fault = Some(cause);
            break;
        }
        if args.realtime {
            if let Some(rest) = frame_period.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    print!("{}", driver.machine().framebuffer.to_text('#', '.'));
    println!("{}", driver.stats_line());
    if let Some(radius) = args.disasm {
        print_disassembly(&driver, radius);
    }

    match fault {
        Some(cause) => {
            eprintln!(
                "error: {cause} at pc {:#05x}",
                driver.machine().registers.pc()
            );
            Err(1)
        }
        None => Ok(()),
    }
}

fn main() {
    env_logger::init();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
