//! Test that boolean options accept bare, bool and string forms.

use tagconf::Configure;

#[derive(Configure, Default)]
struct Flags {
    #[config(envconfig = "A", secret)]
    a: String,

    #[config(envconfig = "B", secret = true)]
    b: String,

    #[config(envconfig = "C", secret = "T")]
    c: String,

    #[config(envconfig = "D", required = false)]
    d: String,

    #[config(envconfig = "E", ignored = "0")]
    e: String,
}

fn main() {
    let fields = Flags::fields();
    assert!(fields[0].secret);
    assert!(fields[1].secret);
    assert!(fields[2].secret);
    assert!(!fields[3].required);
    assert!(!fields[4].ignored);
}
