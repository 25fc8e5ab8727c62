use std::env;

fn main() {
    let target = env::var("TARGET").unwrap();

    // MCU link arguments only apply to the AVR image; host builds
    // (unit tests) skip them.
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega128");
        println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");
    }

    if env::var("PROFILE").unwrap() == "debug" {
        println!("cargo:rustc-cfg=feature=\"debug\"");
    }
}
