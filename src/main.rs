use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use clap::{arg, crate_version, Command};

use adaptive_huffman::progress::TerminalProgress;
use adaptive_huffman::{codec, STD_CODEC_CONFIG};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let long_help = "Examples:
---------
Compress:      `adaptive-huffman pack -i my_file -o my_file.ahuf`
Expand:        `adaptive-huffman unpack -i my_file.ahuf -o my_file`";

    let mut main_cmd = Command::new("adaptive-huffman")
        .about("Adaptive (Vitter/FGK) Huffman compression with no stored code table")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("pack")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("compress a file"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("unpack")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("expand a file"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("pack") {
        let source_path = cmd.get_one::<String>("input").expect(RCH);
        let destination_path = cmd.get_one::<String>("output").expect(RCH);
        let source_size = std::fs::metadata(source_path)?.len();

        let mut source = BufReader::new(File::open(source_path)?);
        let mut destination = BufWriter::new(File::create(destination_path)?);
        let mut config = STD_CODEC_CONFIG;
        config.update_stride = source_size / 1000 + 1;

        println!("packing: {source_path} --> {destination_path}");
        let mut progress = TerminalProgress::new(source_size);
        let metrics = codec::encode::<u32, _, _>(
            &mut source,
            &mut destination,
            &config,
            Some(&mut progress),
        )?;
        println!(
            "bytes input {} output {} ({:.1}% reduction, {:.2?})",
            metrics.input_bytes,
            metrics.output_bytes,
            metrics.percent_reduction(),
            metrics.elapsed
        );
        destination.flush()?;
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("unpack") {
        let source_path = cmd.get_one::<String>("input").expect(RCH);
        let destination_path = cmd.get_one::<String>("output").expect(RCH);
        let source_size = std::fs::metadata(source_path)?.len();

        let mut source = BufReader::new(File::open(source_path)?);
        let mut destination = BufWriter::new(File::create(destination_path)?);
        let mut config = STD_CODEC_CONFIG;
        config.update_stride = source_size / 1000 + 1;

        println!("unpacking: {source_path} --> {destination_path}");
        let mut progress = TerminalProgress::new(source_size);
        let metrics = codec::decode::<u32, _, _>(
            &mut source,
            &mut destination,
            &config,
            Some(&mut progress),
        )?;
        println!(
            "bytes input {} output {} ({:.2?})",
            metrics.input_bytes, metrics.output_bytes, metrics.elapsed
        );
        destination.flush()?;
        return Ok(());
    }

    eprintln!("no action specified, use exactly one of pack/unpack");
    std::process::exit(1);
}
