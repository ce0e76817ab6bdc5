//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - taille bornée
//! - budget temps global
//! - invariants : pas de panique, même entrée => même sortie,
//!   normalisation idempotente, messages d’erreur toujours classés

use std::time::{Duration, Instant};

use super::eval::{evaluer, LONGUEUR_MAX};
use super::normalise::normaliser;
use super::ErreurEval;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

const PREFIXES_ERREUR: [&str; 5] = [
    "Division by zero",
    "Invalid syntax",
    "Unknown function or variable: ",
    "Result is not a number",
    "Error: ",
];

fn check_message(expr: &str, e: &ErreurEval) {
    let msg = e.to_string();
    assert!(
        PREFIXES_ERREUR.iter().any(|p| msg.starts_with(p)),
        "message non classé: expr={expr:?} msg={msg:?}"
    );
}

/* ------------------------ Génération (bornée) ------------------------ */

// Fragments bruts : mélange de valide, de presque valide et d’hostile.
const FRAGMENTS: [&str; 40] = [
    "0", "1", "2", "7", "10", "0.5", ".25", "3.", "1e5", "1E3", "12345678901234567890",
    "pi", "e", "tau", "inf", "nan", "x", "sqrt", "sin", "log", "factorial", "max", "+", "-",
    "*", "/", "//", "%", "**", "^", "(", ")", ",", " ", "'", ".", "__import__", "[", "=",
    "_",
];

fn gen_brut(rng: &mut Rng) -> String {
    let n = 1 + rng.pick(12) as usize;
    (0..n)
        .map(|_| FRAGMENTS[rng.pick(FRAGMENTS.len() as u32) as usize])
        .collect()
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 => rng.pick(20).to_string(),
        1 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        2 => "pi".to_string(),
        3 => "e".to_string(),
        4 => format!("{}%", rng.pick(200)),
        5 => format!("{}pi", 1 + rng.pick(4)),
        _ => format!("({})", rng.pick(9)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    let a = gen_expr(rng, depth - 1);
    match rng.pick(10) {
        0 => gen_atom(rng),
        1 => format!("({a}+{})", gen_expr(rng, depth - 1)),
        2 => format!("({a}-{})", gen_expr(rng, depth - 1)),
        3 => format!("({a}*{})", gen_expr(rng, depth - 1)),
        4 => format!("({a}/{})", gen_expr(rng, depth - 1)),
        5 => format!("({a}//{})", gen_expr(rng, depth - 1)),
        // opérande gauche parenthésé : "8%e" serait un pourcentage ("(8/100)e")
        6 => format!("(({a})%{})", gen_expr(rng, depth - 1)),
        7 => format!("({a})**{}", rng.pick(4)),
        8 => {
            let f = ["sqrt", "sin", "cos", "log", "abs", "floor"][rng.pick(6) as usize];
            format!("{f}({a})")
        }
        _ => {
            if rng.coin() {
                format!("-{a}")
            } else {
                format!("max({a}, {})", gen_expr(rng, depth - 1))
            }
        }
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let r1 = evaluer(&expr);

        // pureté : deux appels, même résultat (Debug compare aussi les NaN)
        let r2 = evaluer(&expr);
        assert_eq!(format!("{r1:?}"), format!("{r2:?}"), "expr={expr:?}");

        match r1 {
            Ok(_) => seen_ok += 1,
            Err(e) => {
                // bien formé : jamais de faute de syntaxe ni de nom inconnu
                assert!(
                    !matches!(e, ErreurEval::SyntaxeInvalide { .. } | ErreurEval::NomInconnu(_)),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
                check_message(&expr, &e);
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_entrees_brutes() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..400 {
        budget(t0, max);

        let brut = gen_brut(&mut rng);

        // normalisation : point fixe
        let une = normaliser(&brut);
        assert_eq!(normaliser(&une), une, "brut={brut:?}");

        if let Err(e) = evaluer(&brut) {
            check_message(&brut, &e);
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let expr = somme_balancee("1/2", 200);
    assert!(expr.chars().count() <= LONGUEUR_MAX);
    budget(t0, max);

    let n = evaluer(&expr).unwrap_or_else(|e| panic!("err: {e}"));

    // 200*(1/2) = 100
    assert_eq!(n.to_string(), "100");
}

#[test]
fn fuzz_safe_geants_refuses_vite() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    for expr in [
        "9**9**9",
        "factorial(10**6)",
        "2**(2**64)",
        "10**5000 * 10**5000",
        "comb(10**9, 10**8)",
        "perm(10**7)",
    ] {
        budget(t0, max);
        assert_eq!(
            evaluer(expr),
            Err(ErreurEval::echec("integer result too large")),
            "expr={expr:?}"
        );
    }
}
