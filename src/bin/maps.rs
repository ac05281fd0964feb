fn main() {
    fundamentals::collections::maps::run();
}
