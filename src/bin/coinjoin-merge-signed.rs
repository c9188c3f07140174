fn main() {
  gentx::coinjoin_main(gentx::coinjoin::Mode::Signed);
}
