use std::process::ExitCode;

fn main() -> ExitCode {
    address_verifier_lib::run()
}
