// If QVGA resolution not specified, the demo uses QQVGA resolution
fn main() {
    if !cfg!(feature = "qvga") {
        println!("cargo:rustc-cfg=feature=\"qqvga\"");
    }
}
