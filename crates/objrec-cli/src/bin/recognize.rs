use objrec_cli::{RecognizeArgs, finish, init_logging, parse_args, run_recognize};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: RecognizeArgs = parse_args();
    init_logging(args.verbose);
    let options = args.match_options();
    finish(run_recognize(
        &args.input,
        &args.descriptions,
        &args.output,
        &options,
    ))
}
