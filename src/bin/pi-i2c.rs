//! Command line access to I2C/SMBus devices.
//!
//! ```text
//! $ pi-i2c detect
//!      0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f
//! 00:          -- -- -- -- -- -- -- -- -- -- -- -- --
//! 10: -- -- -- -- -- -- -- -- -- -- -- -- -- -- -- --
//! 20: -- -- -- -- -- -- -- -- -- -- -- -- -- -- -- --
//! 30: -- -- -- -- -- -- -- -- -- -- -- -- -- -- -- --
//! 40: -- -- -- -- -- -- -- -- 48 -- -- -- -- -- -- --
//! 50: -- -- -- -- -- -- -- -- -- -- -- -- -- -- -- --
//! 60: -- -- -- -- -- -- -- -- 68 -- -- -- -- -- -- --
//! 70: -- -- -- -- -- -- -- --
//! $ pi-i2c -v read-word 0x48 0x00 --big-endian --signed
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pi_i2c::{probe, revision, Bus, ByteOrder, I2cDevice, TinyUsbBus};

/// Probe and access devices on an I2C/SMBus bus
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bus number (/dev/i2c-N), defaults to the bus routed to the board header
    #[arg(short, long, global = true)]
    bus: Option<u32>,

    /// Path of the i2c-dev device, overrides --bus
    #[arg(long, global = true)]
    device: Option<PathBuf>,

    /// Use the attached i2c-tiny-usb adapter instead of a kernel bus
    #[arg(long, global = true, conflicts_with_all = ["bus", "device"])]
    usb: bool,

    /// Report every transfer
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a map of the addresses that answer
    Detect {
        /// Probe 0x00-0xff instead of the regular 7-bit range
        #[arg(long)]
        all: bool,
    },
    /// Check whether a single address answers
    Probe {
        #[arg(value_parser = parse_number)]
        address: i32,
    },
    /// Read a byte, from a register if one is given
    ReadByte {
        #[arg(value_parser = parse_number)]
        address: i32,
        #[arg(value_parser = parse_number)]
        register: Option<i32>,
        #[arg(long)]
        signed: bool,
    },
    /// Read a 16-bit register
    ReadWord {
        #[arg(value_parser = parse_number)]
        address: i32,
        #[arg(value_parser = parse_number)]
        register: i32,
        #[arg(long)]
        signed: bool,
        #[arg(long)]
        big_endian: bool,
    },
    /// Read up to 32 bytes starting at a register
    ReadBlock {
        #[arg(value_parser = parse_number)]
        address: i32,
        #[arg(value_parser = parse_number)]
        register: i32,
        /// Number of bytes, ignored with --smbus
        #[arg(default_value_t = 32)]
        count: usize,
        /// SMBus block read, the device sends the count
        #[arg(long)]
        smbus: bool,
    },
    /// Write a byte, to a register if one is given
    WriteByte {
        #[arg(value_parser = parse_number)]
        address: i32,
        /// Register, or the value itself when no value follows
        #[arg(value_parser = parse_number)]
        register: i32,
        #[arg(value_parser = parse_number)]
        value: Option<i32>,
    },
    /// Write a 16-bit register
    WriteWord {
        #[arg(value_parser = parse_number)]
        address: i32,
        #[arg(value_parser = parse_number)]
        register: i32,
        #[arg(value_parser = parse_number)]
        value: i32,
    },
    /// Write up to 32 bytes starting at a register
    WriteBlock {
        #[arg(value_parser = parse_number)]
        address: i32,
        #[arg(value_parser = parse_number)]
        register: i32,
        #[arg(value_parser = parse_byte, required = true)]
        data: Vec<u8>,
        /// SMBus block write, sends a count byte first
        #[arg(long)]
        smbus: bool,
    },
    /// Print the board revision and its default bus
    Revision,
}

/// Accepts decimal, `0x` hexadecimal and `0b` binary numbers.
fn parse_number(text: &str) -> std::result::Result<i32, String> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let parsed = if let Some(hex) = digits.strip_prefix("0x").or(digits.strip_prefix("0X")) {
        i32::from_str_radix(hex, 16)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        i32::from_str_radix(bin, 2)
    } else {
        digits.parse()
    };
    let value = parsed.map_err(|err| format!("invalid number {:?}: {}", text, err))?;
    Ok(if negative { -value } else { value })
}

fn parse_byte(text: &str) -> std::result::Result<u8, String> {
    let value = parse_number(text)?;
    u8::try_from(value).map_err(|_| format!("{} is out of range (0-255)", text))
}

fn open_bus(args: &Args) -> Result<Box<dyn Bus>> {
    if args.usb {
        let bus =
            TinyUsbBus::open_single_device().context("opening i2c-tiny-usb adapter")?;
        return Ok(Box::new(bus));
    }
    open_kernel_bus(args)
}

#[cfg(target_os = "linux")]
fn open_kernel_bus(args: &Args) -> Result<Box<dyn Bus>> {
    let config = pi_i2c::BusConfig {
        number: args.bus,
        path: args.device.clone(),
    };
    let path = config.device_path();
    let bus = pi_i2c::LinuxBus::open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(Box::new(bus))
}

#[cfg(not(target_os = "linux"))]
fn open_kernel_bus(_args: &Args) -> Result<Box<dyn Bus>> {
    anyhow::bail!("kernel I2C buses are only available on Linux, use --usb")
}

fn detect(bus: &mut dyn Bus, all: bool) {
    let (first, last) = if all { (0x00u16, 0xffu16) } else { (0x03, 0x77) };
    println!("     0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f");
    for row in (0..=last).step_by(16) {
        print!("{:02x}:", row);
        for address in row..(row + 16).min(last + 1) {
            if address < first {
                print!("   ");
            } else if probe(&mut *bus, address.into()) {
                print!(" {:02x}", address);
            } else {
                print!(" --");
            }
        }
        println!();
    }
}

fn print_block(values: &[u8]) {
    let hex: Vec<String> = values.iter().map(|value| format!("0x{:02x}", value)).collect();
    println!("{}", hex.join(" "));
}

fn print_revision() {
    println!(
        "revision {}, default bus {}",
        revision::board_revision(),
        revision::default_bus_number()
    );
}

fn device(bus: &mut dyn Bus, address: i32, verbose: bool) -> Result<I2cDevice<&mut dyn Bus>> {
    Ok(I2cDevice::new(bus, address)?.with_verbose(verbose))
}

fn run(bus: &mut dyn Bus, command: Command, verbose: bool) -> Result<()> {
    match command {
        Command::Detect { all } => detect(bus, all),
        Command::Probe { address } => {
            if probe(bus, address) {
                println!("0x{:02x}: found", address);
            } else {
                println!("0x{:02x}: no answer", address);
            }
        }
        Command::ReadByte {
            address,
            register,
            signed,
        } => {
            let mut dev = device(bus, address, verbose)?;
            match (register, signed) {
                (None, false) => println!("0x{:02x}", dev.receive_byte()?),
                (None, true) => println!("{}", dev.receive_byte_signed()?),
                (Some(register), false) => println!("0x{:02x}", dev.read_byte(register)?),
                (Some(register), true) => println!("{}", dev.read_byte_signed(register)?),
            }
        }
        Command::ReadWord {
            address,
            register,
            signed,
            big_endian,
        } => {
            let order = if big_endian {
                ByteOrder::Big
            } else {
                ByteOrder::Little
            };
            let mut dev = device(bus, address, verbose)?;
            if signed {
                println!("{}", dev.read_word_signed(register, order)?);
            } else {
                println!("0x{:04x}", dev.read_word(register, order)?);
            }
        }
        Command::ReadBlock {
            address,
            register,
            count,
            smbus,
        } => {
            let mut dev = device(bus, address, verbose)?;
            let values = if smbus {
                dev.read_smbus_block(register)?
            } else {
                dev.read_block(register, count)?
            };
            print_block(&values);
        }
        Command::WriteByte {
            address,
            register,
            value,
        } => {
            let mut dev = device(bus, address, verbose)?;
            match value {
                None => dev.send_byte(register)?,
                Some(value) => dev.write_byte(register, value)?,
            }
        }
        Command::WriteWord {
            address,
            register,
            value,
        } => device(bus, address, verbose)?.write_word(register, value)?,
        Command::WriteBlock {
            address,
            register,
            data,
            smbus,
        } => {
            let mut dev = device(bus, address, verbose)?;
            if smbus {
                dev.write_smbus_block(register, &data)?;
            } else {
                dev.write_block(register, &data)?;
            }
        }
        Command::Revision => print_revision(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // the revision doesn't need a bus
    if let Command::Revision = args.command {
        print_revision();
        return Ok(());
    }

    let mut bus = open_bus(&args)?;
    run(bus.as_mut(), args.command, args.verbose)
}
