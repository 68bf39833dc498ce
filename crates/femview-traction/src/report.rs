//! Text reports printed after surface generation and traction integration.

use std::fmt::{self, Write as _};

use nalgebra::Vector3;

use crate::auto::AutoN;
use crate::generate::SampledSurface;
use crate::integrate::TractionResultants;

/// Format a float the way C's `%g` does with the default precision of 6.
pub fn format_g(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{x:.5e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = usize::try_from(5 - exponent).unwrap_or(0);
        trim_fraction(&format!("{x:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn sign(value: f64) -> char {
    if value < 0.0 { '-' } else { '+' }
}

fn write_vector(f: &mut fmt::Formatter<'_>, name: &str, v: &Vector3<f64>, axes: [&str; 3]) -> fmt::Result {
    writeln!(
        f,
        "{name} = {}{} {} {}{} {} {}{}",
        format_g(v[0]),
        axes[0],
        sign(v[1]),
        format_g(v[1].abs()),
        axes[1],
        sign(v[2]),
        format_g(v[2].abs()),
        axes[2]
    )?;
    writeln!(f, "{name} magnitude:  {}", format_g(v.norm()))
}

impl fmt::Display for TractionResultants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const GLOBAL: [&str; 3] = ["x", "y", "z"];
        const LOCAL: [&str; 3] = ["v", "u1", "u2"];
        writeln!(f, "Traction area:  {}", format_g(self.area))?;
        write_vector(f, "Fo", &self.force, GLOBAL)?;
        write_vector(f, "Fp", &self.force_local, LOCAL)?;
        write_vector(f, "Mo", &self.moment, GLOBAL)?;
        write_vector(f, "Mp", &self.moment_local, LOCAL)
    }
}

/// Progress and result lines of an automatic `n` computation.
pub fn auto_n_report(auto: &AutoN) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Beginning automatic computation of surface 'n' convergence . . .");
    for n in &auto.trail {
        let _ = writeln!(out, "   n:  {n}");
    }
    let _ = writeln!(out, ". . . convergence complete");
    out.push_str(&surface_report(&auto.surface));
    out
}

/// Point count, sampled area and frame of a generated surface.
pub fn surface_report(surface: &SampledSurface) -> String {
    let mut out = String::new();
    let p = surface.params.p;
    let b = &surface.basis;
    let _ = writeln!(out, "Number of points:  {}", surface.len());
    let _ = writeln!(out, "surface area:  {:.6}", surface.sampled_area());
    let _ = writeln!(out, "p  ==>  {:.6}, {:.6}, {:.6}", p.x, p.y, p.z);
    let _ = writeln!(out, "u0 ==>  {:.6}, {:.6}, {:.6}", b.u0.x, b.u0.y, b.u0.z);
    let _ = writeln!(out, "u1 ==>  {:.6}, {:.6}, {:.6}", b.u1.x, b.u1.y, b.u1.z);
    let _ = writeln!(out, "u2 ==>  {:.6}, {:.6}, {:.6}", b.u2.x, b.u2.y, b.u2.z);
    out
}
