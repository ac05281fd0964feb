fn main() {
    fundamentals::collections::slices::run();
}
