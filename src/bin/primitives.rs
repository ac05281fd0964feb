fn main() {
    fundamentals::basics::primitives::run();
}
