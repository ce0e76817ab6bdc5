// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Précédences : + -  <  * / // %  <  unaire + -  <  **
// - ** est associatif à droite ; son opérande droit peut porter un signe (2**-1)
// - Ident suivi de '(' => appel de fonction (arité comptée aux virgules)
// - '(' après une valeur (nombre, ')') => appel postfixe sur cette valeur ;
//   l’échec ("'int' object is not callable") vient à l’évaluation
// - '(' seule => groupe ; avec une virgule => tuple ; "()" => tuple vide
// - virgules hors de toute parenthèse => tuple (1, 2)
//
// NOTE:
// - Les groupes/appels sont des barrières sur la pile : aucun opérateur
//   ne les traverse en dépilant.

use super::erreur::ErreurEval;
use super::expr::{Expr, OpBin, OpUn};
use super::jetons::Tok;
use super::nombre::Nombre;

/// Profondeur maximale de l’arbre (garde-fou pile d’appels).
pub const PROFONDEUR_MAX: usize = 200;

#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Num(Nombre),
    Nom(String),
    Bin(OpBin),
    Un(OpUn),
    Appel(String, usize),
    /// Appel dont la cible est la valeur sous les arguments.
    AppelValeur(usize),
    Tuple(usize),
}

/// Ce qui a ouvert une parenthèse.
enum Ouverture {
    Groupe,
    Fonction(String),
    Valeur,
}

/// Élément de la pile d’opérateurs.
enum Pile {
    Bin(OpBin),
    Un(OpUn),
    Groupe {
        ouverture: Ouverture,
        virgules: usize,
    },
}

const PRECEDENCE_UNAIRE: u8 = 3;

fn precedence(op: OpBin) -> u8 {
    match op {
        OpBin::Add | OpBin::Sub => 1,
        OpBin::Mul | OpBin::Div | OpBin::FloorDiv | OpBin::Mod => 2,
        OpBin::Pow => 4,
    }
}

fn is_right_associative(op: OpBin) -> bool {
    matches!(op, OpBin::Pow)
}

fn op_binaire(t: &Tok) -> Option<OpBin> {
    match t {
        Tok::Plus => Some(OpBin::Add),
        Tok::Minus => Some(OpBin::Sub),
        Tok::Star => Some(OpBin::Mul),
        Tok::Slash => Some(OpBin::Div),
        Tok::SlashSlash => Some(OpBin::FloorDiv),
        Tok::Percent => Some(OpBin::Mod),
        Tok::StarStar => Some(OpBin::Pow),
        _ => None,
    }
}

/// Dépile les opérateurs vers la sortie jusqu’au groupe le plus proche (exclu).
fn depiler_jusqu_au_groupe(ops: &mut Vec<Pile>, out: &mut Vec<Rpn>) {
    while let Some(top) = ops.last() {
        match top {
            Pile::Groupe { .. } => break,
            Pile::Bin(op) => out.push(Rpn::Bin(*op)),
            Pile::Un(op) => out.push(Rpn::Un(*op)),
        }
        ops.pop();
    }
}

fn ouvrir(ouvertes: &mut usize) -> Result<(), ErreurEval> {
    *ouvertes += 1;
    if *ouvertes > PROFONDEUR_MAX {
        return Err(ErreurEval::echec("expression too deeply nested"));
    }
    Ok(())
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Nom("pi"), Num(2), Bin(Div), Appel("sin", 1)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Rpn>, ErreurEval> {
    if tokens.is_empty() {
        return Err(ErreurEval::syntaxe("entrée vide"));
    }

    let mut out: Vec<Rpn> = Vec::new();
    let mut ops: Vec<Pile> = Vec::new();

    // vrai quand le prochain jeton doit être une valeur (début, après opérateur, '(' ou ',')
    let mut attend_valeur = true;
    let mut virgules_haut: usize = 0;
    let mut prec: Option<&Tok> = None;
    // parenthèses ouvertes (n’apparaissent pas dans la profondeur de l’arbre)
    let mut ouvertes: usize = 0;

    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];

        match tok {
            Tok::Num(n) => {
                if !attend_valeur {
                    return Err(ErreurEval::syntaxe("deux valeurs adjacentes"));
                }
                out.push(Rpn::Num(n.clone()));
                attend_valeur = false;
            }

            Tok::Ident(nom) => {
                if !attend_valeur {
                    return Err(ErreurEval::syntaxe("deux valeurs adjacentes"));
                }
                if matches!(tokens.get(i + 1), Some(Tok::LPar)) {
                    // appel : la parenthèse ouvrante est consommée avec le nom
                    ouvrir(&mut ouvertes)?;
                    ops.push(Pile::Groupe {
                        ouverture: Ouverture::Fonction(nom.clone()),
                        virgules: 0,
                    });
                    prec = tokens.get(i + 1);
                    i += 2;
                    continue;
                }
                out.push(Rpn::Nom(nom.clone()));
                attend_valeur = false;
            }

            Tok::LPar => {
                ouvrir(&mut ouvertes)?;
                let ouverture = if attend_valeur {
                    Ouverture::Groupe
                } else {
                    // "2 (3)", "(1+2) (3)" : appel sur la valeur qui précède
                    attend_valeur = true;
                    Ouverture::Valeur
                };
                ops.push(Pile::Groupe {
                    ouverture,
                    virgules: 0,
                });
            }

            Tok::Comma => {
                if attend_valeur {
                    return Err(ErreurEval::syntaxe("virgule sans valeur"));
                }
                depiler_jusqu_au_groupe(&mut ops, &mut out);
                match ops.last_mut() {
                    Some(Pile::Groupe { virgules, .. }) => *virgules += 1,
                    _ => virgules_haut += 1,
                }
                attend_valeur = true;
            }

            Tok::RPar => {
                // ')' directement après '(' ou ',' : liste vide / virgule finale
                let ferme_vide = attend_valeur;
                if ferme_vide && !matches!(prec, Some(Tok::LPar | Tok::Comma)) {
                    return Err(ErreurEval::syntaxe("opérande manquant avant ')'"));
                }

                depiler_jusqu_au_groupe(&mut ops, &mut out);
                let Some(Pile::Groupe { ouverture, virgules }) = ops.pop() else {
                    return Err(ErreurEval::syntaxe("')' sans '(' correspondante"));
                };
                ouvertes -= 1;

                let elements = if ferme_vide { virgules } else { virgules + 1 };
                match ouverture {
                    Ouverture::Fonction(nom) => out.push(Rpn::Appel(nom, elements)),
                    Ouverture::Valeur => out.push(Rpn::AppelValeur(elements)),
                    Ouverture::Groupe if virgules == 0 && !ferme_vide => {} // simple groupe
                    Ouverture::Groupe => out.push(Rpn::Tuple(elements)),
                }
                attend_valeur = false;
            }

            _ => {
                let Some(op) = op_binaire(tok) else {
                    return Err(ErreurEval::syntaxe("jeton inattendu"));
                };

                if attend_valeur {
                    // + / - en position de valeur : opérateur unaire préfixe
                    match op {
                        OpBin::Add => ops.push(Pile::Un(OpUn::Pos)),
                        OpBin::Sub => ops.push(Pile::Un(OpUn::Neg)),
                        _ => {
                            return Err(ErreurEval::syntaxe(format!(
                                "opérateur '{}' sans opérande gauche",
                                op.symbole()
                            )))
                        }
                    }
                } else {
                    // dépile tant que:
                    // - on n'est pas bloqué par un groupe
                    // - et la précédence/associativité exige de sortir l'opérateur du haut
                    let p_tok = precedence(op);
                    while let Some(top) = ops.last() {
                        let (sortie, p_top) = match top {
                            Pile::Groupe { .. } => break,
                            Pile::Bin(b) => (Rpn::Bin(*b), precedence(*b)),
                            Pile::Un(u) => (Rpn::Un(*u), PRECEDENCE_UNAIRE),
                        };

                        let doit_pop = if is_right_associative(op) {
                            p_top > p_tok
                        } else {
                            p_top >= p_tok
                        };

                        if !doit_pop {
                            break;
                        }
                        out.push(sortie);
                        ops.pop();
                    }

                    ops.push(Pile::Bin(op));
                    attend_valeur = true;
                }
            }
        }

        prec = Some(tok);
        i += 1;
    }

    // "1," est un tuple d’un élément ; "1+" est une faute
    let virgule_finale = attend_valeur && matches!(prec, Some(Tok::Comma));
    if attend_valeur && !virgule_finale {
        return Err(ErreurEval::syntaxe("expression incomplète"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match op {
            Pile::Groupe { .. } => return Err(ErreurEval::syntaxe("parenthèses non fermées")),
            Pile::Bin(b) => out.push(Rpn::Bin(b)),
            Pile::Un(u) => out.push(Rpn::Un(u)),
        }
    }

    if virgules_haut > 0 {
        let elements = if virgule_finale {
            virgules_haut
        } else {
            virgules_haut + 1
        };
        out.push(Rpn::Tuple(elements));
    }

    Ok(out)
}

/// Construit une Expr à partir d’une RPN, en bornant la profondeur.
pub fn from_rpn(rpn: &[Rpn]) -> Result<Expr, ErreurEval> {
    // (expression, profondeur)
    let mut st: Vec<(Expr, usize)> = Vec::new();

    let invalide = || ErreurEval::syntaxe("expression invalide");

    for item in rpn.iter().cloned() {
        let (e, profondeur) = match item {
            Rpn::Num(n) => (Expr::Num(n), 1),
            Rpn::Nom(s) => (Expr::Nom(s), 1),

            Rpn::Un(op) => {
                let (x, p) = st.pop().ok_or_else(invalide)?;
                (Expr::Unaire(op, Box::new(x)), p + 1)
            }

            Rpn::Bin(op) => {
                let (b, pb) = st.pop().ok_or_else(invalide)?;
                let (a, pa) = st.pop().ok_or_else(invalide)?;
                (Expr::Binaire(op, Box::new(a), Box::new(b)), pa.max(pb) + 1)
            }

            Rpn::Appel(nom, n) => {
                let (args, p) = depiler_n(&mut st, n)?;
                (Expr::Appel(Box::new(Expr::Nom(nom)), args), p + 1)
            }

            Rpn::AppelValeur(n) => {
                let (args, p) = depiler_n(&mut st, n)?;
                let (cible, pc) = st.pop().ok_or_else(invalide)?;
                (Expr::Appel(Box::new(cible), args), p.max(pc) + 1)
            }

            Rpn::Tuple(n) => {
                let (items, p) = depiler_n(&mut st, n)?;
                (Expr::Tuple(items), p + 1)
            }
        };

        if profondeur > PROFONDEUR_MAX {
            return Err(ErreurEval::echec("expression too deeply nested"));
        }
        st.push((e, profondeur));
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        _ => Err(invalide()),
    }
}

/// Retire les n derniers éléments (dans l’ordre d’origine) + leur profondeur max.
fn depiler_n(st: &mut Vec<(Expr, usize)>, n: usize) -> Result<(Vec<Expr>, usize), ErreurEval> {
    if st.len() < n {
        return Err(ErreurEval::syntaxe("arguments manquants"));
    }
    let items = st.split_off(st.len() - n);
    let profondeur = items.iter().map(|(_, p)| *p).max().unwrap_or(0);
    Ok((items.into_iter().map(|(e, _)| e).collect(), profondeur))
}

/// Format utilitaire (démarche) : RPN en texte.
pub fn format_rpn(rpn: &[Rpn]) -> String {
    rpn.iter()
        .map(|r| match r {
            Rpn::Num(n) => n.to_string(),
            Rpn::Nom(s) => s.clone(),
            Rpn::Bin(op) => op.symbole().to_string(),
            Rpn::Un(OpUn::Neg) => "neg".to_string(),
            Rpn::Un(OpUn::Pos) => "pos".to_string(),
            Rpn::Appel(nom, n) => format!("{nom}/{n}"),
            Rpn::AppelValeur(n) => format!("call/{n}"),
            Rpn::Tuple(n) => format!("tuple/{n}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::expr::format_expr;
    use crate::noyau::jetons::tokenize;

    fn rpn(s: &str) -> String {
        format_rpn(&to_rpn(&tokenize(s).unwrap()).unwrap())
    }

    fn arbre(s: &str) -> String {
        format_expr(&from_rpn(&to_rpn(&tokenize(s).unwrap()).unwrap()).unwrap())
    }

    fn refuse(s: &str) {
        let r = tokenize(s).and_then(|t| to_rpn(&t)).and_then(|r| from_rpn(&r));
        assert!(
            matches!(r, Err(ErreurEval::SyntaxeInvalide { .. })),
            "s={s:?} r={r:?}"
        );
    }

    #[test]
    fn precedences() {
        assert_eq!(rpn("1+2*3"), "1 2 3 * +");
        assert_eq!(rpn("(1+2)*3"), "1 2 + 3 *");
        assert_eq!(rpn("7-2-1"), "7 2 - 1 -");
        assert_eq!(rpn("2**3**2"), "2 3 2 ** **");
    }

    #[test]
    fn unaires() {
        assert_eq!(arbre("-2**2"), "-(2 ** 2)");
        assert_eq!(arbre("2**-1"), "(2 ** -1)");
        assert_eq!(arbre("-2*3"), "(-2 * 3)");
        assert_eq!(arbre("2*-3"), "(2 * -3)");
        assert_eq!(arbre("--+1"), "--+1");
    }

    #[test]
    fn appels_et_tuples() {
        assert_eq!(rpn("sin(pi/2)"), "pi 2 / sin/1");
        assert_eq!(rpn("max(1, 2, 3)"), "1 2 3 max/3");
        assert_eq!(rpn("f()"), "f/0");
        assert_eq!(rpn("f(1,)"), "1 f/1");
        assert_eq!(arbre("(1, 2)"), "(1, 2)");
        assert_eq!(arbre("(1,)"), "(1,)");
        assert_eq!(arbre("()"), "()");
        assert_eq!(arbre("1, 2"), "(1, 2)");
        assert_eq!(arbre("1,"), "(1,)");
        assert_eq!(arbre("min((1, 2))"), "min((1, 2))");
    }

    #[test]
    fn fautes_de_syntaxe() {
        for s in [
            "", "1+", "*2", "(1", "1)", "(1+)", "2 3", "pi e", "(2) 3", "(,)", "f(,)", "1,,2",
            "2 (", "2 (,)",
        ] {
            refuse(s);
        }
    }

    #[test]
    fn appels_postfixes_sur_valeurs() {
        assert_eq!(rpn("2 (3)"), "2 3 call/1");
        assert_eq!(arbre("2 (3)"), "2(3)");
        assert_eq!(arbre("(1+2) (3, 4)"), "(1 + 2)(3, 4)");
        assert_eq!(arbre("(2) ()"), "2()");
        assert_eq!(arbre("f(1)(2)"), "f(1)(2)");
        // l’appel lie plus fort que ** et le signe
        assert_eq!(arbre("2**3 (4)"), "(2 ** 3(4))");
        assert_eq!(arbre("-2 (3)"), "-2(3)");
        assert_eq!(arbre("1 + (5/100) (2)"), "(1 + (5 / 100)(2))");
    }

    #[test]
    fn profondeur_bornee() {
        let profond = format!("{}1{}", "(".repeat(150), ")".repeat(150));
        assert!(from_rpn(&to_rpn(&tokenize(&profond).unwrap()).unwrap()).is_ok());

        let trop = format!("{}1{}", "(".repeat(PROFONDEUR_MAX + 1), ")".repeat(PROFONDEUR_MAX + 1));
        assert_eq!(
            to_rpn(&tokenize(&trop).unwrap()),
            Err(ErreurEval::echec("expression too deeply nested"))
        );

        let signes = format!("{}1", "-".repeat(PROFONDEUR_MAX + 5));
        let r = from_rpn(&to_rpn(&tokenize(&signes).unwrap()).unwrap());
        assert_eq!(r, Err(ErreurEval::echec("expression too deeply nested")));
    }
}
