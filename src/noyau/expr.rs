// src/noyau/expr.rs
//
// AST + évaluation.
//
// L’évaluation ne voit QUE l’espace de noms passé en paramètre : un identifiant
// absent de la liste blanche est une erreur, jamais une recherche ailleurs.

use super::erreur::ErreurEval;
use super::espace::Espace;
use super::nombre::Nombre;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBin {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl OpBin {
    pub fn symbole(self) -> &'static str {
        match self {
            OpBin::Add => "+",
            OpBin::Sub => "-",
            OpBin::Mul => "*",
            OpBin::Div => "/",
            OpBin::FloorDiv => "//",
            OpBin::Mod => "%",
            OpBin::Pow => "**",
        }
    }

    pub fn appliquer(self, a: &Nombre, b: &Nombre) -> Result<Nombre, ErreurEval> {
        match self {
            OpBin::Add => a.additionner(b),
            OpBin::Sub => a.soustraire(b),
            OpBin::Mul => a.multiplier(b),
            OpBin::Div => a.diviser(b),
            OpBin::FloorDiv => a.diviser_plancher(b),
            OpBin::Mod => a.modulo(b),
            OpBin::Pow => a.puissance(b),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUn {
    Neg,
    Pos,
}

impl OpUn {
    pub fn symbole(self) -> &'static str {
        match self {
            OpUn::Neg => "-",
            OpUn::Pos => "+",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(Nombre),
    Nom(String),
    Unaire(OpUn, Box<Expr>),
    Binaire(OpBin, Box<Expr>, Box<Expr>),
    /// Appel postfixe : la cible est un nom (`sin(1)`) ou n’importe quelle valeur (`2(3)`).
    Appel(Box<Expr>, Vec<Expr>),
    Tuple(Vec<Expr>),
}

/// Valeur intermédiaire : seul un Nombre peut être un résultat final.
#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Nombre(Nombre),
    Fonction(&'static str),
    Tuple(Vec<Valeur>),
}

impl Valeur {
    pub fn nom_type(&self) -> &'static str {
        match self {
            Valeur::Nombre(n) => n.nom_type(),
            Valeur::Fonction(_) => "builtin_function_or_method",
            Valeur::Tuple(_) => "tuple",
        }
    }
}

impl From<Nombre> for Valeur {
    fn from(n: Nombre) -> Self {
        Valeur::Nombre(n)
    }
}

impl Expr {
    /// Évalue l’arbre (gauche avant droite, nom de fonction avant ses arguments).
    pub fn evaluer(&self, espace: &Espace) -> Result<Valeur, ErreurEval> {
        match self {
            Expr::Num(n) => Ok(Valeur::Nombre(n.clone())),

            Expr::Nom(nom) => espace.resoudre(nom),

            Expr::Unaire(op, x) => match (op, x.evaluer(espace)?) {
                (OpUn::Neg, Valeur::Nombre(n)) => Ok(Valeur::Nombre(n.oppose())),
                (OpUn::Pos, Valeur::Nombre(n)) => Ok(Valeur::Nombre(n)),
                (op, autre) => Err(ErreurEval::echec(format!(
                    "bad operand type for unary {}: '{}'",
                    op.symbole(),
                    autre.nom_type()
                ))),
            },

            Expr::Binaire(op, a, b) => {
                let va = a.evaluer(espace)?;
                let vb = b.evaluer(espace)?;
                match (&va, &vb) {
                    (Valeur::Nombre(x), Valeur::Nombre(y)) => Ok(Valeur::Nombre(op.appliquer(x, y)?)),
                    _ => Err(ErreurEval::echec(format!(
                        "unsupported operand type(s) for {}: '{}' and '{}'",
                        op.symbole(),
                        va.nom_type(),
                        vb.nom_type()
                    ))),
                }
            }

            Expr::Appel(cible, args) => {
                let cible = cible.evaluer(espace)?;
                let valeurs = args
                    .iter()
                    .map(|a| a.evaluer(espace))
                    .collect::<Result<Vec<_>, _>>()?;
                match cible {
                    Valeur::Fonction(f) => espace.appeler(f, &valeurs),
                    autre => Err(ErreurEval::echec(format!(
                        "'{}' object is not callable",
                        autre.nom_type()
                    ))),
                }
            }

            Expr::Tuple(items) => Ok(Valeur::Tuple(
                items
                    .iter()
                    .map(|a| a.evaluer(espace))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
        }
    }
}

/// Affichage parenthésé (démarche).
pub fn format_expr(e: &Expr) -> String {
    match e {
        Expr::Num(n) => n.to_string(),
        Expr::Nom(s) => s.clone(),
        Expr::Unaire(op, x) => format!("{}{}", op.symbole(), format_expr(x)),
        Expr::Binaire(op, a, b) => {
            format!("({} {} {})", format_expr(a), op.symbole(), format_expr(b))
        }
        Expr::Appel(cible, args) => {
            let args: Vec<String> = args.iter().map(format_expr).collect();
            format!("{}({})", format_expr(cible), args.join(", "))
        }
        Expr::Tuple(items) => {
            let items: Vec<String> = items.iter().map(format_expr).collect();
            if items.len() == 1 {
                format!("({},)", items[0])
            } else {
                format!("({})", items.join(", "))
            }
        }
    }
}
