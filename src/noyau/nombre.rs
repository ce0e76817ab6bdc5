// src/noyau/nombre.rs
//
// Nombre = entier exact (BigInt) OU flottant (f64).
//
// Règles arithmétiques :
// - entier ∘ entier reste exact pour + - * // % et ** (exposant >= 0)
// - '/' est toujours la division vraie (flottant correctement arrondi)
// - dès qu’un opérande est flottant, le calcul passe en flottant
// - // et % arrondissent vers -∞ (le reste prend le signe du diviseur)
//
// Garde-fou : la taille des entiers est bornée (BITS_MAX), sinon 9**9**9
// gèle l’interface.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use super::erreur::ErreurEval;

/// Taille maximale (en bits) d’un entier intermédiaire ou final (~4200 chiffres).
pub const BITS_MAX: u64 = 14_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Nombre {
    Entier(BigInt),
    Reel(f64),
}

impl From<i64> for Nombre {
    fn from(n: i64) -> Self {
        Nombre::Entier(BigInt::from(n))
    }
}

impl From<f64> for Nombre {
    fn from(x: f64) -> Self {
        Nombre::Reel(x)
    }
}

/// Refuse un entier au-delà de BITS_MAX.
pub fn borner(n: BigInt) -> Result<BigInt, ErreurEval> {
    if n.bits() > BITS_MAX {
        Err(ErreurEval::echec("integer result too large"))
    } else {
        Ok(n)
    }
}

/// Conversion entier -> flottant, en échec si hors plage.
pub fn entier_vers_f64(n: &BigInt) -> Result<f64, ErreurEval> {
    match n.to_f64() {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(ErreurEval::echec("int too large to convert to float")),
    }
}

/// Flottant entier -> BigInt (floor/ceil/round/trunc).
pub fn f64_vers_entier(x: f64) -> Result<BigInt, ErreurEval> {
    if x.is_nan() {
        return Err(ErreurEval::echec("cannot convert float NaN to integer"));
    }
    if x.is_infinite() {
        return Err(ErreurEval::echec(
            "cannot convert float infinity to integer",
        ));
    }
    BigInt::from_f64(x).ok_or_else(|| ErreurEval::echec("cannot convert float to integer"))
}

impl Nombre {
    pub fn nom_type(&self) -> &'static str {
        match self {
            Nombre::Entier(_) => "int",
            Nombre::Reel(_) => "float",
        }
    }

    pub fn est_zero(&self) -> bool {
        match self {
            Nombre::Entier(n) => n.is_zero(),
            Nombre::Reel(x) => *x == 0.0,
        }
    }

    pub fn vers_f64(&self) -> Result<f64, ErreurEval> {
        match self {
            Nombre::Entier(n) => entier_vers_f64(n),
            Nombre::Reel(x) => Ok(*x),
        }
    }

    /// Flottant “au mieux” (±inf si l’entier déborde), pour les comparaisons mixtes.
    fn approx_f64(&self) -> f64 {
        match self {
            Nombre::Entier(n) => n.to_f64().unwrap_or(if n.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
            Nombre::Reel(x) => *x,
        }
    }

    /// Flottant sans partie fractionnaire -> entier (4.0 -> 4). Le reste est inchangé.
    pub fn normaliser(self) -> Nombre {
        match self {
            Nombre::Reel(x) if x.is_finite() && x.fract() == 0.0 => match BigInt::from_f64(x) {
                Some(n) => Nombre::Entier(n),
                None => Nombre::Reel(x),
            },
            autre => autre,
        }
    }

    pub fn oppose(&self) -> Nombre {
        match self {
            Nombre::Entier(n) => Nombre::Entier(-n),
            Nombre::Reel(x) => Nombre::Reel(-x),
        }
    }

    pub fn valeur_absolue(&self) -> Nombre {
        match self {
            Nombre::Entier(n) => Nombre::Entier(n.abs()),
            Nombre::Reel(x) => Nombre::Reel(x.abs()),
        }
    }

    /// Comparaison numérique (None si NaN est impliqué).
    pub fn comparer(&self, autre: &Nombre) -> Option<Ordering> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => Some(a.cmp(b)),
            _ => self.approx_f64().partial_cmp(&autre.approx_f64()),
        }
    }

    /* ------------------------ Opérateurs binaires ------------------------ */

    pub fn additionner(&self, autre: &Nombre) -> Result<Nombre, ErreurEval> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => Ok(Nombre::Entier(borner(a + b)?)),
            _ => Ok(Nombre::Reel(self.vers_f64()? + autre.vers_f64()?)),
        }
    }

    pub fn soustraire(&self, autre: &Nombre) -> Result<Nombre, ErreurEval> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => Ok(Nombre::Entier(borner(a - b)?)),
            _ => Ok(Nombre::Reel(self.vers_f64()? - autre.vers_f64()?)),
        }
    }

    pub fn multiplier(&self, autre: &Nombre) -> Result<Nombre, ErreurEval> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => {
                if a.bits() + b.bits() > BITS_MAX + 1 {
                    return Err(ErreurEval::echec("integer result too large"));
                }
                Ok(Nombre::Entier(borner(a * b)?))
            }
            _ => Ok(Nombre::Reel(self.vers_f64()? * autre.vers_f64()?)),
        }
    }

    /// Division vraie : toujours un flottant.
    pub fn diviser(&self, autre: &Nombre) -> Result<Nombre, ErreurEval> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => {
                if b.is_zero() {
                    return Err(ErreurEval::DivisionParZero);
                }
                // a/b exact puis un seul arrondi vers f64
                let q = BigRational::new(a.clone(), b.clone()).to_f64();
                match q {
                    Some(x) if x.is_finite() => Ok(Nombre::Reel(x)),
                    _ => Err(ErreurEval::echec(
                        "integer division result too large for a float",
                    )),
                }
            }
            _ => {
                let (x, y) = (self.vers_f64()?, autre.vers_f64()?);
                if y == 0.0 {
                    return Err(ErreurEval::DivisionParZero);
                }
                Ok(Nombre::Reel(x / y))
            }
        }
    }

    pub fn diviser_plancher(&self, autre: &Nombre) -> Result<Nombre, ErreurEval> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => {
                if b.is_zero() {
                    return Err(ErreurEval::DivisionParZero);
                }
                Ok(Nombre::Entier(a.div_floor(b)))
            }
            _ => {
                let (q, _r) = divmod_reel(self.vers_f64()?, autre.vers_f64()?)?;
                Ok(Nombre::Reel(q))
            }
        }
    }

    pub fn modulo(&self, autre: &Nombre) -> Result<Nombre, ErreurEval> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => {
                if b.is_zero() {
                    return Err(ErreurEval::DivisionParZero);
                }
                Ok(Nombre::Entier(a.mod_floor(b)))
            }
            _ => {
                let (_q, r) = divmod_reel(self.vers_f64()?, autre.vers_f64()?)?;
                Ok(Nombre::Reel(r))
            }
        }
    }

    pub fn puissance(&self, autre: &Nombre) -> Result<Nombre, ErreurEval> {
        match (self, autre) {
            (Nombre::Entier(b), Nombre::Entier(e)) => puissance_entiere(b, e),
            _ => puissance_reelle(self.vers_f64()?, autre.vers_f64()?),
        }
    }
}

/// divmod flottant : quotient plancher + reste du signe du diviseur.
pub fn divmod_reel(x: f64, y: f64) -> Result<(f64, f64), ErreurEval> {
    if y == 0.0 {
        return Err(ErreurEval::DivisionParZero);
    }

    let mut reste = x % y;
    let mut div = (x - reste) / y;
    if reste != 0.0 {
        if (y < 0.0) != (reste < 0.0) {
            reste += y;
            div -= 1.0;
        }
    } else {
        reste = 0.0_f64.copysign(y);
    }

    let quotient = if div != 0.0 {
        let mut q = div.floor();
        if div - q > 0.5 {
            q += 1.0;
        }
        q
    } else {
        0.0_f64.copysign(x / y)
    };

    Ok((quotient, reste))
}

fn puissance_entiere(base: &BigInt, exposant: &BigInt) -> Result<Nombre, ErreurEval> {
    if exposant.is_negative() {
        if base.is_zero() {
            return Err(ErreurEval::DivisionParZero);
        }
        return puissance_reelle(entier_vers_f64(base)?, entier_vers_f64(exposant)?);
    }

    // bases triviales : pas de borne sur l’exposant
    if base.is_zero() {
        return Ok(Nombre::from(if exposant.is_zero() { 1 } else { 0 }));
    }
    if base.is_one() {
        return Ok(Nombre::from(1));
    }
    if *base == BigInt::from(-1) {
        return Ok(Nombre::from(if exposant.is_even() { 1 } else { -1 }));
    }

    // |base| >= 2 : le résultat a au moins (bits-1)*e + 1 bits
    let e = match exposant.to_u64() {
        Some(e) if (base.bits() - 1).saturating_mul(e) < BITS_MAX => e,
        _ => return Err(ErreurEval::echec("integer result too large")),
    };
    // e < BITS_MAX ici, donc tient sur u32
    let e = u32::try_from(e).map_err(|_| ErreurEval::echec("integer result too large"))?;
    Ok(Nombre::Entier(borner(base.pow(e))?))
}

/// Puissance flottante (aussi utilisée par ** sur entiers à exposant négatif).
pub fn puissance_reelle(x: f64, y: f64) -> Result<Nombre, ErreurEval> {
    if y == 0.0 {
        return Ok(Nombre::Reel(1.0));
    }
    if x.is_nan() {
        return Ok(Nombre::Reel(x));
    }
    if y.is_nan() {
        return Ok(Nombre::Reel(if x == 1.0 { 1.0 } else { y }));
    }
    if x == 0.0 && y < 0.0 && y.is_finite() {
        return Err(ErreurEval::DivisionParZero);
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        // résultat complexe : hors du domaine des nombres réels
        return Err(ErreurEval::PasUnNombre);
    }

    let r = x.powf(y);
    if r.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(ErreurEval::echec("numerical result out of range"));
    }
    Ok(Nombre::Reel(r))
}
