use super::*;

/// The three kind-diagrams split out of one raw diagram.
///
/// Only pairs whose birth and death values differ are kept. The global min-max pair goes
/// to [`Kind::Max`] alone. Otherwise a pair touching a local maximum goes to
/// `Max`, a pair touching a local minimum goes to `Min`, and a 1-saddle/2-saddle
/// pair goes to `Sad`. Nothing forbids a pair from landing in more than one
/// partition; the rules above simply never produce that for well-formed input.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    diagrams: [Diagram<'a>; 3],
}

impl<'a> Partition<'a> {
    /// Splits one raw diagram, collecting only the kinds in `active`.
    pub fn split(raw: &'a [CriticalPair], active: &Active) -> Self {
        let mut diagrams = Kind::ALL.map(|_| Diagram::default());
        for (i, pair) in raw.iter().enumerate().filter(|(_, p)| p.is_persistent()) {
            for kind in Self::kinds(pair).filter(|k| active.contains(*k)) {
                diagrams[kind.index()].push(i, pair);
            }
        }
        Self { diagrams }
    }

    /// Partitions a pair belongs to.
    pub fn kinds(pair: &CriticalPair) -> impl Iterator<Item = Kind> {
        let global = pair.is_global();
        let max = global || pair.touches(CriticalType::LocalMax);
        let min = !global && pair.touches(CriticalType::LocalMin);
        let sad = !global && pair.is_saddle_saddle();
        [(Kind::Min, min), (Kind::Sad, sad), (Kind::Max, max)]
            .into_iter()
            .filter(|(_, member)| *member)
            .map(|(kind, _)| kind)
    }

    pub fn diagram(&self, kind: Kind) -> &Diagram<'a> {
        &self.diagrams[kind.index()]
    }

    /// Splits every raw diagram and narrows `selector` down to the kinds that
    /// are non-empty in at least one input.
    pub fn all(raws: &'a [Vec<CriticalPair>], selector: Selector) -> (Vec<Self>, Active) {
        let mut active = Active::from_selector(selector);
        let partitions = raws
            .iter()
            .map(|raw| Self::split(raw, &active))
            .collect::<Vec<_>>();
        for kind in active.kinds().collect::<Vec<_>>() {
            if partitions.iter().all(|p| p.diagram(kind).is_empty()) {
                log::warn!("{:<32}{:<32}", "disabling empty partition", kind);
                active.disable(kind);
            }
        }
        (partitions, active)
    }
}
