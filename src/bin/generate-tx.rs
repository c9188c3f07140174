fn main() {
  gentx::main();
}
