use objrec_cli::{DescribeArgs, finish, init_logging, parse_args, run_describe};
use objrec_region::AxisRenderOptions;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: DescribeArgs = parse_args();
    init_logging(args.verbose);
    finish(run_describe(
        &args.input,
        &args.descriptions,
        &args.output,
        &AxisRenderOptions::default(),
    ))
}
