use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

/// Writes a LAS file with `DEPT`, `GR` and `RHOB` sampled every 10 m from
/// `top`, 21 rows. Row 5 holds a NULL gamma ray value.
pub fn write_las(dir: &Path, name: &str, top: f64) -> PathBuf {
    let mut las = String::from(
        "~Version information\n\
         VERS.   2.0 : CWLS LOG ASCII STANDARD - VERSION 2.0\n\
         WRAP.   NO  : One line per depth step\n\
         ~Well information\n\
         NULL.   -999.25 : Null value\n\
         WELL.   TEST WELL : Well name\n\
         ~Curve information\n\
         DEPT.M      : Measured depth\n\
         GR  .API    : Gamma ray\n\
         RHOB.G/C3   : Bulk density\n\
         ~ASCII\n",
    );
    for i in 0..21 {
        let depth = top + i as f64 * 10.0;
        let gr = if i == 5 { -999.25 } else { 20.0 + i as f64 * 5.0 };
        let rhob = 2.0 + i as f64 * 0.01;
        writeln!(las, "{depth:.1} {gr:.2} {rhob:.3}").unwrap();
    }
    let path = dir.join(name);
    std::fs::write(&path, las).unwrap();
    path
}
