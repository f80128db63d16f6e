//! Float text for the emitter. zmij may render `4e-6` where YAML wants `4.0e-6`.

use num_traits::float::FloatCore;
use zmij::Float;

/// Format as float string, make changes to be sure valid YAML float
pub(crate) fn push_float_string<F: Float + FloatCore>(target: &mut String, f: F) {
    if f.is_nan() {
        target.push_str(".nan");
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            target.push_str(".inf");
        } else {
            target.push_str("-.inf");
        }
    } else {
        let mut buf = zmij::Buffer::new();
        let s = buf.format_finite(f);
        if s.as_bytes().contains(&b'.') {
            target.push_str(s);
        } else if let Some(exp_pos) = s.find(['e', 'E']) {
            // "4e-6" -> "4.0e-6"
            target.push_str(&s[..exp_pos]);
            target.push_str(".0");
            target.push_str(&s[exp_pos..]);
        } else {
            target.push_str(s);
            target.push_str(".0");
        }
    }
}
