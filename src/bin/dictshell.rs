use std::io;

fn main() -> io::Result<()> {
    env_logger::builder().init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    dictshell::serve(stdin.lock(), stdout.lock())
}
