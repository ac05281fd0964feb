use std::io;

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    fundamentals::basics::control::run(stdin.lock(), io::stdout())
}
