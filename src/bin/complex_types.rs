fn main() {
    fundamentals::collections::arrays::run();
}
