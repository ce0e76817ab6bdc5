// src/noyau/fonctions.rs
//
// Primitives de la liste blanche (voir espace.rs).
//
// Conventions :
// - les arguments entiers sont acceptés partout où un réel est attendu
// - résultat NaN pour une entrée non-NaN  => "math domain error"
// - résultat infini pour une entrée finie => "math range error" (si la fonction
//   peut déborder) sinon "math domain error" (log(0), atanh(1)…)
// - les fonctions entières (factorial, comb…) refusent les flottants

use std::cmp::Ordering;
use std::f64::consts;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreur::ErreurEval;
use super::expr::Valeur;
use super::nombre::{borner, entier_vers_f64, f64_vers_entier, Nombre};

type Res = Result<Valeur, ErreurEval>;

/* ------------------------ Arguments ------------------------ */

fn arite(nom: &str, args: &[Valeur], n: usize) -> Result<(), ErreurEval> {
    if args.len() == n {
        return Ok(());
    }
    let pluriel = if n == 1 { "argument" } else { "arguments" };
    Err(ErreurEval::echec(format!(
        "{nom}() takes exactly {n} {pluriel} ({} given)",
        args.len()
    )))
}

fn arite_entre(nom: &str, args: &[Valeur], min: usize, max: usize) -> Result<(), ErreurEval> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    Err(ErreurEval::echec(format!(
        "{nom}() takes from {min} to {max} arguments ({} given)",
        args.len()
    )))
}

fn nombre(v: &Valeur) -> Result<&Nombre, ErreurEval> {
    match v {
        Valeur::Nombre(n) => Ok(n),
        autre => Err(ErreurEval::echec(format!(
            "must be real number, not {}",
            autre.nom_type()
        ))),
    }
}

fn reel(v: &Valeur) -> Result<f64, ErreurEval> {
    nombre(v)?.vers_f64()
}

fn entier(v: &Valeur) -> Result<&BigInt, ErreurEval> {
    match v {
        Valeur::Nombre(Nombre::Entier(n)) => Ok(n),
        autre => Err(ErreurEval::echec(format!(
            "'{}' object cannot be interpreted as an integer",
            autre.nom_type()
        ))),
    }
}

/// Éléments d’un argument “itérable” (seuls les tuples le sont).
fn elements(v: &Valeur) -> Result<&[Valeur], ErreurEval> {
    match v {
        Valeur::Tuple(items) => Ok(items),
        autre => Err(ErreurEval::echec(format!(
            "'{}' object is not iterable",
            autre.nom_type()
        ))),
    }
}

fn ok_reel(x: f64) -> Res {
    Ok(Valeur::Nombre(Nombre::Reel(x)))
}

fn ok_entier(n: BigInt) -> Res {
    Ok(Valeur::Nombre(Nombre::Entier(n)))
}

fn ok_bool(b: bool) -> Res {
    ok_entier(BigInt::from(u8::from(b)))
}

/* ------------------------ Enveloppes réelles ------------------------ */

/// f(x) réel -> réel, avec classification domaine/plage.
fn math_1(nom: &str, args: &[Valeur], f: fn(f64) -> f64, peut_deborder: bool) -> Res {
    arite(nom, args, 1)?;
    let x = reel(&args[0])?;
    let r = f(x);
    if r.is_nan() && !x.is_nan() {
        return Err(ErreurEval::domaine());
    }
    if r.is_infinite() && x.is_finite() {
        return Err(if peut_deborder {
            ErreurEval::plage()
        } else {
            ErreurEval::domaine()
        });
    }
    ok_reel(r)
}

/// f(x, y) réel -> réel, même classification.
fn math_2(nom: &str, args: &[Valeur], f: fn(f64, f64) -> f64) -> Res {
    arite(nom, args, 2)?;
    let (x, y) = (reel(&args[0])?, reel(&args[1])?);
    let r = f(x, y);
    if r.is_nan() && !x.is_nan() && !y.is_nan() {
        return Err(ErreurEval::domaine());
    }
    if r.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(ErreurEval::plage());
    }
    ok_reel(r)
}

pub fn sin(a: &[Valeur]) -> Res {
    math_1("sin", a, f64::sin, false)
}
pub fn cos(a: &[Valeur]) -> Res {
    math_1("cos", a, f64::cos, false)
}
pub fn tan(a: &[Valeur]) -> Res {
    math_1("tan", a, f64::tan, false)
}
pub fn asin(a: &[Valeur]) -> Res {
    math_1("asin", a, f64::asin, false)
}
pub fn acos(a: &[Valeur]) -> Res {
    math_1("acos", a, f64::acos, false)
}
pub fn atan(a: &[Valeur]) -> Res {
    math_1("atan", a, f64::atan, false)
}
pub fn sinh(a: &[Valeur]) -> Res {
    math_1("sinh", a, f64::sinh, true)
}
pub fn cosh(a: &[Valeur]) -> Res {
    math_1("cosh", a, f64::cosh, true)
}
pub fn tanh(a: &[Valeur]) -> Res {
    math_1("tanh", a, f64::tanh, false)
}
pub fn asinh(a: &[Valeur]) -> Res {
    math_1("asinh", a, f64::asinh, false)
}
pub fn acosh(a: &[Valeur]) -> Res {
    math_1("acosh", a, f64::acosh, false)
}
pub fn atanh(a: &[Valeur]) -> Res {
    math_1("atanh", a, f64::atanh, false)
}
pub fn degrees(a: &[Valeur]) -> Res {
    math_1("degrees", a, f64::to_degrees, true)
}
pub fn radians(a: &[Valeur]) -> Res {
    math_1("radians", a, f64::to_radians, false)
}
pub fn sqrt(a: &[Valeur]) -> Res {
    math_1("sqrt", a, f64::sqrt, false)
}
pub fn cbrt(a: &[Valeur]) -> Res {
    math_1("cbrt", a, f64::cbrt, false)
}
pub fn exp(a: &[Valeur]) -> Res {
    math_1("exp", a, f64::exp, true)
}
pub fn exp2(a: &[Valeur]) -> Res {
    math_1("exp2", a, f64::exp2, true)
}
pub fn expm1(a: &[Valeur]) -> Res {
    math_1("expm1", a, f64::exp_m1, true)
}
pub fn log1p(a: &[Valeur]) -> Res {
    math_1("log1p", a, f64::ln_1p, false)
}
pub fn fabs(a: &[Valeur]) -> Res {
    math_1("fabs", a, f64::abs, false)
}

pub fn atan2(a: &[Valeur]) -> Res {
    math_2("atan2", a, f64::atan2)
}
pub fn copysign(a: &[Valeur]) -> Res {
    math_2("copysign", a, f64::copysign)
}

pub fn fmod(a: &[Valeur]) -> Res {
    arite("fmod", a, 2)?;
    let (x, y) = (reel(&a[0])?, reel(&a[1])?);
    // fmod(x, ±inf) = x pour x fini
    if y.is_infinite() && x.is_finite() {
        return ok_reel(x);
    }
    math_2("fmod", a, |x, y| x % y)
}

pub fn remainder(a: &[Valeur]) -> Res {
    arite("remainder", a, 2)?;
    let (x, y) = (reel(&a[0])?, reel(&a[1])?);
    if x.is_nan() || y.is_nan() {
        return ok_reel(f64::NAN);
    }
    if x.is_infinite() || y == 0.0 {
        return Err(ErreurEval::domaine());
    }
    if y.is_infinite() {
        return ok_reel(x);
    }
    // reste “au plus proche” (égalités vers le quotient pair)
    let q = (x / y).round_ties_even();
    let r = x - q * y;
    ok_reel(if r == 0.0 { 0.0_f64.copysign(x) } else { r })
}

/// Puissance flottante de la bibliothèque mathématique (domaine strict).
pub fn pow(a: &[Valeur]) -> Res {
    arite("pow", a, 2)?;
    let (x, y) = (reel(&a[0])?, reel(&a[1])?);
    if x == 0.0 && y < 0.0 && y.is_finite() {
        return Err(ErreurEval::domaine());
    }
    if x < 0.0 && x.is_finite() && y.is_finite() && y.fract() != 0.0 {
        return Err(ErreurEval::domaine());
    }
    math_2("pow", a, f64::powf)
}

pub fn hypot(a: &[Valeur]) -> Res {
    let xs = a.iter().map(reel).collect::<Result<Vec<_>, _>>()?;
    ok_reel(norme(&xs))
}

/// Norme euclidienne (mise à l’échelle pour éviter les débordements intermédiaires).
fn norme(xs: &[f64]) -> f64 {
    if xs.iter().any(|x| x.is_infinite()) {
        return f64::INFINITY;
    }
    if xs.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }
    let max = xs.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if max == 0.0 {
        return 0.0;
    }
    if let [x, y] = xs {
        return x.hypot(*y);
    }
    let somme: f64 = xs.iter().map(|x| (x / max) * (x / max)).sum();
    max * somme.sqrt()
}

pub fn dist(a: &[Valeur]) -> Res {
    arite("dist", a, 2)?;
    let (p, q) = (elements(&a[0])?, elements(&a[1])?);
    if p.len() != q.len() {
        return Err(ErreurEval::echec(
            "both points must have the same number of dimensions",
        ));
    }
    let diffs = p
        .iter()
        .zip(q)
        .map(|(x, y)| Ok(reel(x)? - reel(y)?))
        .collect::<Result<Vec<f64>, ErreurEval>>()?;
    ok_reel(norme(&diffs))
}

/* ------------------------ Logarithmes ------------------------ */

/// ln(x) pour un nombre quelconque (les grands entiers passent par leurs bits).
fn ln(n: &Nombre) -> Result<f64, ErreurEval> {
    match n {
        Nombre::Entier(i) => {
            if !i.is_positive() {
                return Err(ErreurEval::domaine());
            }
            match i.to_f64() {
                Some(x) if x.is_finite() => Ok(x.ln()),
                _ => {
                    let decal = i.bits() - 64;
                    let haut = entier_vers_f64(&(i >> decal))?;
                    Ok(haut.ln() + decal as f64 * consts::LN_2)
                }
            }
        }
        Nombre::Reel(x) => {
            if x.is_nan() || *x == f64::INFINITY {
                return Ok(*x);
            }
            if *x <= 0.0 {
                return Err(ErreurEval::domaine());
            }
            Ok(x.ln())
        }
    }
}

pub fn log(a: &[Valeur]) -> Res {
    arite_entre("log", a, 1, 2)?;
    let num = ln(nombre(&a[0])?)?;
    match a.get(1) {
        None => ok_reel(num),
        Some(base) => {
            let den = ln(nombre(base)?)?;
            if den == 0.0 {
                return Err(ErreurEval::DivisionParZero);
            }
            ok_reel(num / den)
        }
    }
}

/// log de base fixe : calcul direct si l’argument tient dans un f64 positif.
fn log_fixe(n: &Nombre, f: fn(f64) -> f64, ln_base: f64) -> Result<f64, ErreurEval> {
    match n.vers_f64() {
        Ok(x) if x > 0.0 || x.is_nan() => Ok(f(x)),
        _ => Ok(ln(n)? / ln_base),
    }
}

pub fn log2(a: &[Valeur]) -> Res {
    arite("log2", a, 1)?;
    ok_reel(log_fixe(nombre(&a[0])?, f64::log2, consts::LN_2)?)
}

pub fn log10(a: &[Valeur]) -> Res {
    arite("log10", a, 1)?;
    ok_reel(log_fixe(nombre(&a[0])?, f64::log10, consts::LN_10)?)
}

/* ------------------------ Arrondis / représentation ------------------------ */

fn vers_entier(nom: &str, args: &[Valeur], f: fn(f64) -> f64) -> Res {
    arite(nom, args, 1)?;
    match nombre(&args[0])? {
        Nombre::Entier(n) => ok_entier(n.clone()),
        Nombre::Reel(x) => ok_entier(f64_vers_entier(f(*x))?),
    }
}

pub fn ceil(a: &[Valeur]) -> Res {
    vers_entier("ceil", a, f64::ceil)
}
pub fn floor(a: &[Valeur]) -> Res {
    vers_entier("floor", a, f64::floor)
}
pub fn trunc(a: &[Valeur]) -> Res {
    vers_entier("trunc", a, f64::trunc)
}

pub fn modf(a: &[Valeur]) -> Res {
    arite("modf", a, 1)?;
    let x = reel(&a[0])?;
    let (frac, ent) = if x.is_infinite() {
        (0.0_f64.copysign(x), x)
    } else {
        (x.fract(), x.trunc())
    };
    Ok(Valeur::Tuple(vec![
        Valeur::Nombre(Nombre::Reel(frac)),
        Valeur::Nombre(Nombre::Reel(ent)),
    ]))
}

/// x = m * 2**e avec 0.5 <= |m| < 1.
fn decompose(x: f64) -> (f64, i32) {
    if x == 0.0 || !x.is_finite() {
        return (x, 0);
    }
    let (mut bits, mut decal) = (x.to_bits(), 0);
    if (bits >> 52) & 0x7ff == 0 {
        // sous-normal : on remonte dans les normaux
        bits = (x * 2f64.powi(54)).to_bits();
        decal = -54;
    }
    let exposant = ((bits >> 52) & 0x7ff) as i32 - 1022 + decal;
    let mantisse = f64::from_bits((bits & !(0x7ff_u64 << 52)) | (1022_u64 << 52));
    (mantisse, exposant)
}

pub fn frexp(a: &[Valeur]) -> Res {
    arite("frexp", a, 1)?;
    let (m, e) = decompose(reel(&a[0])?);
    Ok(Valeur::Tuple(vec![
        Valeur::Nombre(Nombre::Reel(m)),
        Valeur::Nombre(Nombre::from(i64::from(e))),
    ]))
}

pub fn ldexp(a: &[Valeur]) -> Res {
    arite("ldexp", a, 2)?;
    let x = reel(&a[0])?;
    let i = entier(&a[1])?;
    if x == 0.0 || !x.is_finite() {
        return ok_reel(x);
    }
    // au-delà de ±2200 le résultat est de toute façon 0 ou infini
    let mut k = i.to_i64().unwrap_or(if i.is_negative() { -2200 } else { 2200 }).clamp(-2200, 2200);
    let mut r = x;
    while k > 1000 {
        r *= 2f64.powi(1000);
        k -= 1000;
    }
    while k < -1000 {
        r *= 2f64.powi(-1000);
        k += 1000;
    }
    r *= 2f64.powi(k as i32);
    if r.is_infinite() {
        return Err(ErreurEval::plage());
    }
    ok_reel(r)
}

/// Flottant adjacent à x en direction de y.
fn adjacent(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    if x == y {
        return y;
    }
    if x == 0.0 {
        return f64::from_bits(1).copysign(y);
    }
    let b = x.to_bits();
    if (y > x) == (x > 0.0) {
        f64::from_bits(b + 1)
    } else {
        f64::from_bits(b - 1)
    }
}

pub fn nextafter(a: &[Valeur]) -> Res {
    arite("nextafter", a, 2)?;
    ok_reel(adjacent(reel(&a[0])?, reel(&a[1])?))
}

pub fn ulp(a: &[Valeur]) -> Res {
    arite("ulp", a, 1)?;
    let x = reel(&a[0])?.abs();
    if !x.is_finite() {
        return ok_reel(x);
    }
    let haut = adjacent(x, f64::INFINITY);
    if haut.is_infinite() {
        return ok_reel(x - adjacent(x, 0.0));
    }
    ok_reel(haut - x)
}

/* ------------------------ Tests ------------------------ */

pub fn isfinite(a: &[Valeur]) -> Res {
    arite("isfinite", a, 1)?;
    ok_bool(reel(&a[0])?.is_finite())
}

pub fn isinf(a: &[Valeur]) -> Res {
    arite("isinf", a, 1)?;
    ok_bool(reel(&a[0])?.is_infinite())
}

pub fn isnan(a: &[Valeur]) -> Res {
    arite("isnan", a, 1)?;
    ok_bool(reel(&a[0])?.is_nan())
}

/// Tolérance relative 1e-9, absolue 0.
pub fn isclose(a: &[Valeur]) -> Res {
    arite("isclose", a, 2)?;
    let (x, y) = (reel(&a[0])?, reel(&a[1])?);
    if x == y {
        return ok_bool(true);
    }
    if x.is_infinite() || y.is_infinite() {
        return ok_bool(false);
    }
    let diff = (x - y).abs();
    ok_bool(diff <= 1e-9 * x.abs().max(y.abs()))
}

/* ------------------------ Arithmétique entière ------------------------ */

fn non_negatif<'a>(v: &'a Valeur, quoi: &str) -> Result<&'a BigInt, ErreurEval> {
    let n = entier(v)?;
    if n.is_negative() {
        return Err(ErreurEval::echec(format!(
            "{quoi} must be a non-negative integer"
        )));
    }
    Ok(n)
}

/// Produit des entiers de `debut` (exclu) à `fin` (inclus), borné en taille.
fn produit_borne(debut: &BigInt, fin: &BigInt) -> Result<BigInt, ErreurEval> {
    let mut acc = BigInt::one();
    let mut k = debut + 1;
    while &k <= fin {
        acc = borner(acc * &k)?;
        k += 1;
    }
    Ok(acc)
}

pub fn factorial(a: &[Valeur]) -> Res {
    arite("factorial", a, 1)?;
    let n = entier(&a[0])?;
    if n.is_negative() {
        return Err(ErreurEval::echec(
            "factorial() not defined for negative values",
        ));
    }
    ok_entier(produit_borne(&BigInt::zero(), n)?)
}

pub fn perm(a: &[Valeur]) -> Res {
    arite_entre("perm", a, 1, 2)?;
    let n = non_negatif(&a[0], "n")?;
    let k = match a.get(1) {
        Some(k) => non_negatif(k, "k")?,
        None => n,
    };
    if k > n {
        return ok_entier(BigInt::zero());
    }
    ok_entier(produit_borne(&(n - k), n)?)
}

pub fn comb(a: &[Valeur]) -> Res {
    arite("comb", a, 2)?;
    let n = non_negatif(&a[0], "n")?;
    let k = non_negatif(&a[1], "k")?;
    if k > n {
        return ok_entier(BigInt::zero());
    }
    // symétrie : on itère sur le plus petit des deux
    let k = k.min(&(n - k)).clone();
    let mut acc = BigInt::one();
    let mut i = BigInt::zero();
    while i < k {
        // acc * (n - i) / (i + 1) reste entier à chaque étape
        acc = borner(acc * (n - &i))? / (&i + 1);
        i += 1;
    }
    ok_entier(acc)
}

pub fn gcd(a: &[Valeur]) -> Res {
    let mut acc = BigInt::zero();
    for v in a {
        acc = acc.gcd(entier(v)?);
    }
    ok_entier(acc)
}

pub fn lcm(a: &[Valeur]) -> Res {
    let mut acc = BigInt::one();
    for v in a {
        let n = entier(v)?;
        if n.is_zero() || acc.is_zero() {
            acc = BigInt::zero();
            continue;
        }
        acc = borner(acc.lcm(n))?;
    }
    ok_entier(acc)
}

pub fn isqrt(a: &[Valeur]) -> Res {
    arite("isqrt", a, 1)?;
    let n = entier(&a[0])?;
    if n.is_negative() {
        return Err(ErreurEval::echec("isqrt() argument must be nonnegative"));
    }
    ok_entier(n.sqrt())
}

/* ------------------------ Sommes / produits ------------------------ */

/// Somme flottante exacte (partiels de Shewchuk), un seul arrondi final.
pub fn fsum(a: &[Valeur]) -> Res {
    arite("fsum", a, 1)?;
    let xs = elements(&a[0])?
        .iter()
        .map(reel)
        .collect::<Result<Vec<_>, _>>()?;

    let mut partiels: Vec<f64> = Vec::new();
    let mut speciale = 0.0_f64;
    let mut inf_plus = false;
    let mut inf_moins = false;

    for mut x in xs {
        if !x.is_finite() {
            inf_plus |= x == f64::INFINITY;
            inf_moins |= x == f64::NEG_INFINITY;
            speciale += x;
            continue;
        }
        let mut i = 0;
        for j in 0..partiels.len() {
            let mut y = partiels[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                partiels[i] = lo;
                i += 1;
            }
            x = hi;
        }
        if !x.is_finite() {
            return Err(ErreurEval::echec("intermediate overflow in fsum"));
        }
        partiels.truncate(i);
        partiels.push(x);
    }

    if speciale != 0.0 {
        if inf_plus && inf_moins {
            return Err(ErreurEval::echec("-inf + inf in fsum"));
        }
        return ok_reel(speciale);
    }

    // somme des partiels du plus grand au plus petit, correction d’arrondi au milieu
    let mut hi = 0.0;
    let mut n = partiels.len();
    if n > 0 {
        n -= 1;
        hi = partiels[n];
        let mut lo = 0.0;
        while n > 0 {
            let x = hi;
            n -= 1;
            let y = partiels[n];
            hi = x + y;
            lo = y - (hi - x);
            if lo != 0.0 {
                break;
            }
        }
        if n > 0 && ((lo < 0.0 && partiels[n - 1] < 0.0) || (lo > 0.0 && partiels[n - 1] > 0.0)) {
            let y = lo * 2.0;
            let x = hi + y;
            if y == x - hi {
                hi = x;
            }
        }
    }
    ok_reel(hi)
}

pub fn prod(a: &[Valeur]) -> Res {
    arite("prod", a, 1)?;
    let mut acc = Nombre::from(1);
    for v in elements(&a[0])? {
        acc = acc.multiplier(nombre(v)?)?;
    }
    Ok(Valeur::Nombre(acc))
}

pub fn sumprod(a: &[Valeur]) -> Res {
    arite("sumprod", a, 2)?;
    let (p, q) = (elements(&a[0])?, elements(&a[1])?);
    if p.len() != q.len() {
        return Err(ErreurEval::echec("Inputs are not the same length"));
    }
    let mut acc = Nombre::from(0);
    for (x, y) in p.iter().zip(q) {
        acc = acc.additionner(&nombre(x)?.multiplier(nombre(y)?)?)?;
    }
    Ok(Valeur::Nombre(acc))
}

/* ------------------------ Builtins ------------------------ */

pub fn abs(a: &[Valeur]) -> Res {
    arite("abs", a, 1)?;
    match &a[0] {
        Valeur::Nombre(n) => Ok(Valeur::Nombre(n.valeur_absolue())),
        autre => Err(ErreurEval::echec(format!(
            "bad operand type for abs(): '{}'",
            autre.nom_type()
        ))),
    }
}

/// round(x) -> entier (égalités vers le pair) ; round(x, n) -> même type que x.
pub fn round(a: &[Valeur]) -> Res {
    arite_entre("round", a, 1, 2)?;
    let x = nombre(&a[0])?;
    let chiffres = a.get(1).map(entier).transpose()?;

    match (x, chiffres) {
        (Nombre::Entier(n), None) => ok_entier(n.clone()),
        (Nombre::Entier(n), Some(c)) => ok_entier(arrondir_entier(n, c)?),
        (Nombre::Reel(x), None) => ok_entier(f64_vers_entier(x.round_ties_even())?),
        (Nombre::Reel(x), Some(c)) => ok_reel(arrondir_reel(*x, c)),
    }
}

/// Arrondi d’un entier à 10**(-chiffres) près (chiffres < 0), égalités vers le pair.
fn arrondir_entier(n: &BigInt, chiffres: &BigInt) -> Result<BigInt, ErreurEval> {
    if !chiffres.is_negative() {
        return Ok(n.clone());
    }
    // |n| < 10**4300 (BITS_MAX) : au-delà de 5000 chiffres, tout arrondit à 0
    let k = match (-chiffres).to_u32() {
        Some(k) if k <= 5000 => k,
        _ => return Ok(BigInt::zero()),
    };
    let pas = BigInt::from(10).pow(k);
    let (q, r) = n.div_mod_floor(&pas);
    let double = &r * 2u32;
    let q = match double.cmp(&pas) {
        Ordering::Greater => q + 1,
        Ordering::Equal if q.is_odd() => q + 1,
        _ => q,
    };
    borner(q * pas)
}

fn arrondir_reel(x: f64, chiffres: &BigInt) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }
    let c = chiffres.to_i64().unwrap_or(if chiffres.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    });
    if c > 323 {
        return x;
    }
    if c < -308 {
        return 0.0_f64.copysign(x);
    }
    if c >= 0 {
        // arrondi décimal exact (l’écriture à c décimales), relu en f64
        return format!("{:.*}", c as usize, x).parse().unwrap_or(x);
    }
    let pas = 10f64.powi((-c) as i32);
    let r = (x / pas).round_ties_even() * pas;
    if r.is_finite() {
        r
    } else {
        x
    }
}

fn extremum(nom: &str, args: &[Valeur], garder: Ordering) -> Res {
    let items: &[Valeur] = match args {
        [] => {
            return Err(ErreurEval::echec(format!(
                "{nom} expected at least 1 argument, got 0"
            )))
        }
        [seul] => elements(seul)?,
        plusieurs => plusieurs,
    };
    let Some((premier, reste)) = items.split_first() else {
        return Err(ErreurEval::echec(format!(
            "{nom}() iterable argument is empty"
        )));
    };

    let mut meilleur = premier;
    for v in reste {
        if nombre(v)?.comparer(nombre(meilleur)?) == Some(garder) {
            meilleur = v;
        }
    }
    Ok(meilleur.clone())
}

pub fn min(a: &[Valeur]) -> Res {
    extremum("min", a, Ordering::Less)
}

pub fn max(a: &[Valeur]) -> Res {
    extremum("max", a, Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(n: i64) -> Valeur {
        Valeur::Nombre(Nombre::from(n))
    }

    fn r(x: f64) -> Valeur {
        Valeur::Nombre(Nombre::from(x))
    }

    fn t(items: Vec<Valeur>) -> Valeur {
        Valeur::Tuple(items)
    }

    #[test]
    fn domaine_et_plage() {
        assert_eq!(sqrt(&[e(-1)]), Err(ErreurEval::domaine()));
        assert_eq!(asin(&[e(2)]), Err(ErreurEval::domaine()));
        assert_eq!(log(&[e(0)]), Err(ErreurEval::domaine()));
        assert_eq!(atanh(&[e(1)]), Err(ErreurEval::domaine()));
        assert_eq!(exp(&[e(1000)]), Err(ErreurEval::plage()));
        assert_eq!(fmod(&[e(1), e(0)]), Err(ErreurEval::domaine()));
        assert_eq!(pow(&[e(-8), r(1.0 / 3.0)]), Err(ErreurEval::domaine()));
        assert_eq!(pow(&[e(0), e(-1)]), Err(ErreurEval::domaine()));
    }

    #[test]
    fn valeurs_usuelles() {
        assert_eq!(sqrt(&[e(144)]), Ok(r(12.0)));
        assert_eq!(pow(&[e(2), e(10)]), Ok(r(1024.0)));
        assert_eq!(log(&[e(100), e(10)]), Ok(r(2.0)));
        assert_eq!(degrees(&[r(consts::PI)]), Ok(r(180.0)));
        assert_eq!(hypot(&[e(3), e(4)]), Ok(r(5.0)));
        assert_eq!(dist(&[t(vec![e(0), e(0)]), t(vec![e(3), e(4)])]), Ok(r(5.0)));
        assert_eq!(fabs(&[e(-3)]), Ok(r(3.0)));
        assert_eq!(cbrt(&[e(27)]), Ok(r(3.0)));
    }

    #[test]
    fn log_base_un_divise_par_zero() {
        assert_eq!(log(&[e(10), e(1)]), Err(ErreurEval::DivisionParZero));
    }

    #[test]
    fn log_des_tres_grands_entiers() {
        let n = Valeur::Nombre(Nombre::Entier(BigInt::from(2).pow(2000)));
        let Ok(Valeur::Nombre(Nombre::Reel(x))) = log2(&[n]) else {
            panic!("log2 devait réussir");
        };
        assert!((x - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn arrondis_vers_entier() {
        assert_eq!(floor(&[r(-2.5)]), Ok(e(-3)));
        assert_eq!(ceil(&[r(2.1)]), Ok(e(3)));
        assert_eq!(trunc(&[r(-2.9)]), Ok(e(-2)));
        assert_eq!(floor(&[e(7)]), Ok(e(7)));
        assert_eq!(
            floor(&[r(f64::INFINITY)]),
            Err(ErreurEval::echec("cannot convert float infinity to integer"))
        );
    }

    #[test]
    fn round_pair_et_chiffres() {
        assert_eq!(round(&[r(2.5)]), Ok(e(2)));
        assert_eq!(round(&[r(3.5)]), Ok(e(4)));
        assert_eq!(round(&[r(3.14159), e(2)]), Ok(r(3.14)));
        assert_eq!(round(&[r(1234.5), e(-2)]), Ok(r(1200.0)));
        assert_eq!(round(&[e(1250), e(-2)]), Ok(e(1200)));
        assert_eq!(round(&[e(1350), e(-2)]), Ok(e(1400)));
        assert_eq!(round(&[e(-1250), e(-2)]), Ok(e(-1200)));
        assert_eq!(round(&[e(-1351), e(-2)]), Ok(e(-1400)));
        assert_eq!(round(&[e(7), e(3)]), Ok(e(7)));
        assert!(round(&[r(1.5), r(1.0)]).is_err());
    }

    #[test]
    fn entiers_exacts() {
        assert_eq!(factorial(&[e(5)]), Ok(e(120)));
        assert_eq!(factorial(&[e(0)]), Ok(e(1)));
        assert_eq!(
            factorial(&[e(-1)]),
            Err(ErreurEval::echec("factorial() not defined for negative values"))
        );
        assert_eq!(
            factorial(&[r(5.0)]),
            Err(ErreurEval::echec("'float' object cannot be interpreted as an integer"))
        );
        assert_eq!(
            factorial(&[e(100_000)]),
            Err(ErreurEval::echec("integer result too large"))
        );
        assert_eq!(comb(&[e(5), e(2)]), Ok(e(10)));
        assert_eq!(comb(&[e(2), e(5)]), Ok(e(0)));
        assert_eq!(perm(&[e(5), e(2)]), Ok(e(20)));
        assert_eq!(perm(&[e(4)]), Ok(e(24)));
        assert_eq!(gcd(&[e(12), e(-18)]), Ok(e(6)));
        assert_eq!(gcd(&[]), Ok(e(0)));
        assert_eq!(lcm(&[e(4), e(6)]), Ok(e(12)));
        assert_eq!(isqrt(&[e(17)]), Ok(e(4)));
    }

    #[test]
    fn tuples() {
        assert_eq!(frexp(&[e(8)]), Ok(t(vec![r(0.5), e(4)])));
        assert_eq!(modf(&[r(2.5)]), Ok(t(vec![r(0.5), r(2.0)])));
        assert_eq!(ldexp(&[r(0.5), e(4)]), Ok(r(8.0)));
        assert_eq!(fsum(&[t(vec![r(0.1); 10])]), Ok(r(1.0)));
        assert_eq!(prod(&[t(vec![e(2), e(3), e(4)])]), Ok(e(24)));
        assert_eq!(sumprod(&[t(vec![e(1), e(2)]), t(vec![e(3), e(4)])]), Ok(e(11)));
        assert_eq!(
            fsum(&[e(3)]),
            Err(ErreurEval::echec("'int' object is not iterable"))
        );
    }

    #[test]
    fn min_max() {
        assert_eq!(max(&[e(1), r(2.5), e(2)]), Ok(r(2.5)));
        assert_eq!(min(&[t(vec![e(3), e(1), e(2)])]), Ok(e(1)));
        assert_eq!(
            min(&[t(vec![])]),
            Err(ErreurEval::echec("min() iterable argument is empty"))
        );
        assert_eq!(
            max(&[e(5)]),
            Err(ErreurEval::echec("'int' object is not iterable"))
        );
    }

    #[test]
    fn predicats() {
        assert_eq!(isnan(&[r(f64::NAN)]), Ok(e(1)));
        assert_eq!(isinf(&[e(1)]), Ok(e(0)));
        assert_eq!(isclose(&[r(0.1 + 0.2), r(0.3)]), Ok(e(1)));
        assert_eq!(ulp(&[r(1.0)]), Ok(r(f64::EPSILON)));
        assert_eq!(nextafter(&[r(1.0), r(2.0)]), Ok(r(1.0 + f64::EPSILON)));
    }

    #[test]
    fn arite_verifiee() {
        assert_eq!(
            sin(&[e(1), e(2)]),
            Err(ErreurEval::echec("sin() takes exactly 1 argument (2 given)"))
        );
        assert!(log(&[]).is_err());
        assert_eq!(
            sqrt(&[t(vec![])]),
            Err(ErreurEval::echec("must be real number, not tuple"))
        );
    }
}
