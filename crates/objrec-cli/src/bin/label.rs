use objrec_cli::{LabelArgs, finish, init_logging, parse_args, run_label};
use objrec_region::LabelOptions;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: LabelArgs = parse_args();
    init_logging(args.verbose);
    let options = LabelOptions {
        offset: args.offset,
    };
    finish(run_label(&args.input, &args.output, &options))
}
