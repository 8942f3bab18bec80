use super::{EigsInfo, EigsSettings, SortRule};
use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::timers::Timers;
use std::io::Write;
use std::time::Duration;

impl<T> ConfigurablePrintTarget for EigsInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

const RULE: &str = "--------------------------------------------------";

impl<T> EigsInfo<T>
where
    T: FloatT,
{
    pub(crate) fn print_configuration(
        &mut self,
        settings: &EigsSettings<T>,
        selection: &SortRule<T>,
        sorting: &SortRule<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{}", RULE)?;
        writeln!(out, "         geigs v{}  -  Lanczos eigensolver", crate::VERSION)?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "\nproblem:")?;
        writeln!(out, "  dimension     = {}", self.n)?;
        writeln!(out, "  nev           = {}", self.nev)?;
        writeln!(out, "  ncv           = {}", self.ncv)?;
        if let Some(sigma) = self.sigma {
            writeln!(out, "  shift (σ)     = {}", expformat!("{:.4e}", sigma))?;
        }
        writeln!(out, "  sort rule     = {}", sorting)?;
        if selection != sorting {
            writeln!(out, "  selection     = {}", selection)?;
        }

        writeln!(out, "\nsettings:")?;
        writeln!(
            out,
            "  max iter = {}, tol = {}, precision: {} bit",
            settings.max_iter,
            expformat!("{:.1e}", settings.tol),
            _get_precision_string::<T>()
        )?;
        writeln!(
            out,
            "  seed = {:#x}, shift solve = {}",
            settings.seed, settings.shift_solve_method
        )?;
        writeln!(out)?;

        std::io::Result::Ok(())
    }

    pub(crate) fn print_status_header(&mut self, settings: &EigsSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "iter    ")?;
        write!(out, "nconv    ")?;
        write!(out, "‖f‖(B)       ")?;
        write!(out, "op count")?;
        writeln!(out,)?;
        writeln!(out, "{}", RULE)?;
        out.flush()?;
        std::io::Result::Ok(())
    }

    pub(crate) fn print_status(&mut self, settings: &EigsSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>4}  ", self.iterations)?;
        write!(out, "{:>3}/{:<3}  ", self.nconv, self.nev)?;
        write!(out, "{}   ", expformat!("{:8.4e}", self.fnorm))?;
        write!(out, "{:>6}", self.operations)?;
        writeln!(out,)?;

        std::io::Result::Ok(())
    }

    pub(crate) fn print_footer(
        &mut self,
        settings: &EigsSettings<T>,
        timers: &Timers,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{}", RULE)?;
        writeln!(out, "Terminated with status = {}", self.status)?;
        writeln!(out, "converged eigenpairs = {} of {}", self.nconv, self.nev)?;
        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(self.solve_time)
        )?;
        timers.write_to(out)?;

        std::io::Result::Ok(())
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}

// convert a string in LowerExp display format into one that
// 1) always has a sign after the exponent, and
// 2) has at least two digits in the exponent.

fn _exp_str_reformat(mut thestr: String) -> String {
    let eidx = match thestr.find('e') {
        Some(idx) => idx,
        None => return thestr,
    };
    let has_sign = thestr[eidx + 1..].starts_with('-');
    let ndigits = thestr.len() - eidx - 1 - usize::from(has_sign);

    let chars = match (has_sign, ndigits < 2) {
        (false, true) => "+0",
        (false, false) => "+",
        (true, true) => "0",
        (true, false) => "",
    };

    let shift = if has_sign { 2 } else { 1 };
    thestr.insert_str(eidx + shift, chars);
    thestr
}

#[test]
fn test_exp_str_reformat() {
    assert_eq!(_exp_str_reformat(format!("{:.4e}", 2.5f64)), "2.5000e+00");
    assert_eq!(_exp_str_reformat(format!("{:.1e}", 1e-10f64)), "1.0e-10");
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5e-3f64)), "1.50e-03");
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5e123f64)), "1.50e+123");
    assert_eq!(_exp_str_reformat("inf".to_string()), "inf");
}
