//! Extract frames from an xyz trajectory, and relabel their comment lines.
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use xyz_extract::{
    filter_frames, CellTable, Comment, CommentMode, FrameSelection, Lattice, Range, Summary,
    XYZReader, XYZWriter,
};

/// Select frames from an xyz trajectory and write them to a new (extended) xyz file.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input path (xyz).
    input: PathBuf,

    /// Output path (xyz). An existing file is overwritten.
    output: PathBuf,

    /// Keep every `stride`th frame, counting from the first frame after the skipped ones.
    #[arg(long, default_value_t = NonZeroU64::MIN)]
    stride: NonZeroU64,

    /// Number of frames to skip from the beginning of the trajectory.
    #[arg(long, default_value_t = 0)]
    skip: u64,

    /// Stop before the frame with this index. Reading ends there.
    #[arg(long)]
    stop: Option<u64>,

    /// How to write the comment line of each frame.
    ///
    /// - `nothing` labels each frame as `Frame: <index>`, with the index of the frame in the
    ///   input trajectory.
    ///
    /// - `copy` copies the input comment line.
    ///
    /// - `extended` writes an extended xyz comment with the lattice from `--cell_file`, or else
    ///   `--lattice`. Without either, the input comment is copied.
    #[arg(long, visible_alias = "comment", value_enum, default_value_t = CommentMode::Nothing)]
    mode: CommentMode,

    /// A CP2K cell file, with a header line followed by `step time Ax Ay Az Bx By Bz Cx Cy Cz`
    /// rows. Frames are matched to rows by their index. Only used in extended mode.
    #[arg(long = "cell_file", visible_alias = "cell-file")]
    cell_file: Option<PathBuf>,

    /// A fixed lattice for every frame, as "a b c" for a rectangular box or as nine values
    /// "xx xy xz yx yy yz zx zy zz". Only used in extended mode.
    #[arg(long, allow_hyphen_values = true)]
    lattice: Option<String>,

    /// Log more. May be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log less.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(summary) => {
            log::info!(
                "wrote {} of {} frames to {}",
                summary.written,
                summary.read,
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Set up `env_logger` for this crate, unless `RUST_LOG` says otherwise.
fn init_logging(verbose: u8, quiet: u8) {
    let level = match verbose as i16 - quiet as i16 {
        i16::MIN..=-1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let filter = format!("{}={level}", env!("CARGO_CRATE_NAME"));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> xyz_extract::Result<Summary> {
    // Everything that can be rejected up front is, before the output file is created.
    let lattice = args
        .lattice
        .as_deref()
        .map(str::parse::<Lattice>)
        .transpose()?;
    let cells = match (&args.cell_file, args.mode) {
        (Some(path), CommentMode::Extended) => Some(load_cells(path)?),
        (Some(path), _) => {
            log::warn!(
                "the cell file {} is only used in extended mode, ignoring it",
                path.display()
            );
            None
        }
        (None, _) => None,
    };
    let comment = Comment::resolve(args.mode, cells, lattice);
    let frame_selection =
        FrameSelection::Range(Range::new(Some(args.skip), args.stop, Some(args.stride)));

    let mut reader = XYZReader::open(&args.input).map_err(|err| {
        log::error!("could not open {}", args.input.display());
        err
    })?;
    let mut writer = XYZWriter::create(&args.output).map_err(|err| {
        log::error!("could not create {}", args.output.display());
        err
    })?;

    let summary = filter_frames(&mut reader, &mut writer, &frame_selection, &comment)
        .map_err(|err| {
            log::error!("failed while extracting frames from {}", args.input.display());
            err
        })?;
    if summary.written == 0 {
        log::warn!(
            "no frames were selected from the {} frames that were read (skip {}, stride {})",
            summary.read,
            args.skip,
            args.stride
        );
    }

    Ok(summary)
}

fn load_cells(path: &Path) -> xyz_extract::Result<CellTable> {
    let cells = CellTable::open(path).map_err(|err| {
        log::error!("could not load the cell file {}", path.display());
        err
    })?;
    log::debug!("read {} cell records from {}", cells.len(), path.display());
    Ok(cells)
}
