fn main() {
    // ESP-IDF environment propagation is only needed for the device build.
    // Host builds (library + tests) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
