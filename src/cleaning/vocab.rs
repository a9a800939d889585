use crate::cleaning::condition::ConditionTable;
use crate::models::Condition;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A brand with the spellings that identify it and the models it makes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub models: Vec<String>,
}

impl BrandEntry {
    fn new(name: &str, aliases: &[&str], models: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            models: models.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Keyword lists the cleaner matches listing text against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vocabulary {
    pub brands: Vec<BrandEntry>,
    pub colors: Vec<String>,
    /// Extra condition phrases, merged over the standard grades
    pub conditions: BTreeMap<String, Condition>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let brands = vec![
            BrandEntry::new(
                "Fender",
                &[],
                &[
                    "Stratocaster", "Strat", "Telecaster", "Tele", "Jazzmaster", "Jaguar",
                    "Mustang", "Precision Bass", "Jazz Bass",
                ],
            ),
            BrandEntry::new(
                "Gibson",
                &[],
                &[
                    "Les Paul", "SG", "ES-335", "ES-175", "Explorer", "Flying V", "Firebird",
                    "Thunderbird",
                ],
            ),
            BrandEntry::new("Epiphone", &[], &["Les Paul", "SG", "Casino", "Sheraton", "Dot"]),
            BrandEntry::new(
                "Squier",
                &[],
                &["Stratocaster", "Strat", "Telecaster", "Tele", "Jazzmaster"],
            ),
            BrandEntry::new(
                "PRS",
                &["Paul Reed Smith"],
                &["Custom 24", "Custom 22", "McCarty", "Silver Sky", "SE"],
            ),
            BrandEntry::new("Ibanez", &[], &["RG", "S Series", "Artcore", "JEM", "Talman"]),
            BrandEntry::new(
                "Gretsch",
                &[],
                &["White Falcon", "Duo Jet", "Country Gentleman", "Electromatic"],
            ),
            BrandEntry::new("Rickenbacker", &[], &["330", "360", "4003"]),
            BrandEntry::new(
                "Music Man",
                &["Ernie Ball Music Man"],
                &["StingRay", "Axis", "Silhouette", "Majesty"],
            ),
            BrandEntry::new("G&L", &[], &["ASAT", "Legacy", "L-2000"]),
            BrandEntry::new("ESP", &["LTD"], &["Eclipse", "Horizon", "EC-1000"]),
            BrandEntry::new("Jackson", &[], &["Soloist", "Dinky", "Rhoads", "Kelly"]),
            BrandEntry::new("Schecter", &[], &["Hellraiser", "Omen", "Blackjack"]),
            BrandEntry::new("Charvel", &[], &["San Dimas", "So-Cal", "Pro-Mod"]),
            BrandEntry::new("Yamaha", &[], &["Pacifica", "Revstar", "SG"]),
            BrandEntry::new("Guild", &[], &["Starfire", "S-100", "Bluesbird"]),
            BrandEntry::new("Danelectro", &[], &["'59", "Baritone"]),
            BrandEntry::new("Godin", &[], &["5th Avenue", "Session", "Radiator"]),
            BrandEntry::new("Kramer", &[], &["Baretta", "Striker", "Pacer"]),
            BrandEntry::new("Dean", &[], &["ML", "Razorback", "V"]),
        ];

        let colors = [
            "Sunburst", "Fireburst", "Honeyburst", "Burst", "Blue", "White", "Black", "Natural",
            "Blonde", "Turquoise", "Red", "Green", "Gold", "Silver", "Pink", "Yellow", "Orange",
            "Cherry", "Violet", "Ebony", "Brown", "Mahogany", "Walnut", "Ivory",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            brands,
            colors,
            conditions: BTreeMap::new(),
        }
    }
}

/// A case-insensitive term that only matches between non-alphanumerics
#[derive(Debug, Clone)]
struct Term {
    label: String,
    pattern: Regex,
}

impl Term {
    fn new(label: &str, text: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?i)(?:^|[^\p{{L}}\p{{N}}])({})(?:$|[^\p{{L}}\p{{N}}])",
            regex::escape(text.trim())
        ))
        .with_context(|| format!("Invalid vocabulary term {:?}", text))?;

        Ok(Self {
            label: label.to_string(),
            pattern,
        })
    }

    /// Byte offset of the first match and the matched length
    fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        let caps = self.pattern.captures(haystack)?;
        let m = caps.get(1)?;
        Some((m.start(), m.len()))
    }
}

/// Earliest term in `haystack`; on equal offsets the longer match wins
fn earliest<'a>(terms: impl IntoIterator<Item = &'a Term>, haystack: &str) -> Option<&'a Term> {
    terms
        .into_iter()
        .filter_map(|t| t.find(haystack).map(|(start, len)| (start, len, t)))
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, t)| t)
}

#[derive(Debug, Clone)]
struct CompiledBrand {
    spellings: Vec<Term>,
    models: Vec<Term>,
}

/// [`Vocabulary`] compiled into matchers
#[derive(Debug, Clone)]
pub struct Matcher {
    brands: Vec<CompiledBrand>,
    colors: Vec<Term>,
    conditions: ConditionTable,
}

impl Matcher {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let mut brands = Vec::with_capacity(vocabulary.brands.len());
        for entry in &vocabulary.brands {
            let mut spellings = vec![Term::new(&entry.name, &entry.name)?];
            for alias in &entry.aliases {
                spellings.push(Term::new(&entry.name, alias)?);
            }
            let models = entry
                .models
                .iter()
                .map(|m| Term::new(m, m))
                .collect::<Result<Vec<_>>>()?;
            brands.push(CompiledBrand { spellings, models });
        }

        let colors = vocabulary
            .colors
            .iter()
            .map(|c| Term::new(c, c))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            brands,
            colors,
            conditions: ConditionTable::new(&vocabulary.conditions),
        })
    }

    fn brand_index(&self, text: &str) -> Option<usize> {
        let spellings = self
            .brands
            .iter()
            .enumerate()
            .flat_map(|(i, b)| b.spellings.iter().map(move |t| (i, t)));

        spellings
            .filter_map(|(i, t)| t.find(text).map(|(start, len)| (start, len, i)))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, _, i)| i)
    }

    /// Brand and model from the title, then the description.
    ///
    /// The model is only looked up among the matched brand's models.
    pub fn brand_and_model(
        &self,
        title: &str,
        description: &str,
    ) -> (Option<String>, Option<String>) {
        let Some(index) = self
            .brand_index(title)
            .or_else(|| self.brand_index(description))
        else {
            return (None, None);
        };

        let brand = &self.brands[index];
        let name = brand.spellings[0].label.clone();
        let model = earliest(&brand.models, title)
            .or_else(|| earliest(&brand.models, description))
            .map(|t| t.label.clone());

        (Some(name), model)
    }

    pub fn color(&self, title: &str) -> Option<String> {
        earliest(&self.colors, title).map(|t| t.label.clone())
    }

    pub fn condition(&self, text: &str) -> Condition {
        self.conditions.normalize(text)
    }
}
