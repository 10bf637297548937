fn main() {
    keyphrase_cli::run_main();
}
