use crate::core::error::{AmountProblem, LedgerError};
use crate::core::expense::ExpenseEntry;
use crate::core::money::{Money, MAX_BILL_TOTAL};
use crate::core::participant::{Participant, ParticipantName};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// The roster of participants and the list of expense entries for one bill.
///
/// Every mutation keeps two invariants: participant names are unique
/// (case-insensitively), and every stored entry's payer and split group
/// refer to current participants. The one exception is the payer of an entry
/// whose payer was removed, see [`Ledger::remove_participant`]. The sum of
/// all amounts also stays within [`MAX_BILL_TOTAL`].
///
/// Deserialising a `Ledger` re-checks the invariants, so a snapshot coming
/// back from storage or a share link is rejected if it is inconsistent.
///
/// # Examples
///
/// ```
/// use bill_split::core::ledger::Ledger;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = Ledger::new();
/// ledger.add_participant("Alice", None).unwrap();
/// ledger.add_participant("Bob", None).unwrap();
/// ledger.add_expense("Lunch", dec!(100), "Alice", ["Alice", "Bob"]).unwrap();
///
/// assert!(ledger.add_participant("bob", None).is_err());
/// assert_eq!(ledger.total_amount(), dec!(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LedgerRepr")]
pub struct Ledger {
    participants: Vec<Participant>,
    expenses: Vec<ExpenseEntry>,
}

#[derive(Deserialize)]
struct LedgerRepr {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    expenses: Vec<ExpenseEntry>,
}

impl TryFrom<LedgerRepr> for Ledger {
    type Error = LedgerError;

    fn try_from(repr: LedgerRepr) -> Result<Self, Self::Error> {
        let ledger = Ledger {
            participants: repr.participants,
            expenses: repr.expenses,
        };
        ledger.validate()?;
        Ok(ledger)
    }
}

/// What removing a participant did to the rest of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRemoval {
    /// The participant that was removed.
    pub participant: Participant,
    /// Entries deleted because the participant was their only splitter.
    pub deleted_expenses: Vec<ExpenseEntry>,
    /// Indices (after removal) of entries whose split group shrank.
    pub shrunk_expenses: Vec<usize>,
    /// Indices (after removal) of entries still paid by the removed participant.
    pub dangling_payer: Vec<usize>,
}

impl ParticipantRemoval {
    /// Drop the removed participant from a caller-owned selection, such as
    /// the people picked for an entry that is still being composed.
    pub fn prune_selection(&self, selection: &mut Vec<ParticipantName>) {
        selection.retain(|name| name != self.participant.name());
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    pub fn participant(&self, name: &ParticipantName) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name() == name)
    }

    pub fn contains(&self, name: &ParticipantName) -> bool {
        self.participant(name).is_some()
    }

    /// Sum of all expense amounts.
    pub fn total_amount(&self) -> Money {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// Add a participant to the end of the roster.
    pub fn add_participant(
        &mut self,
        name: impl Into<ParticipantName>,
        promptpay: Option<String>,
    ) -> Result<&Participant, LedgerError> {
        let name = name.into();
        if name.is_blank() {
            return Err(LedgerError::EmptyName);
        }
        if self.contains(&name) {
            return Err(LedgerError::DuplicateName(name));
        }

        let mut participant = Participant::new(name);
        if let Some(promptpay) = promptpay {
            participant = participant.with_promptpay(promptpay);
        }
        debug!("adding participant {}", participant.name());
        self.participants.push(participant);
        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Remove a participant and cascade into the expense entries.
    ///
    /// Entries split only with this participant are deleted. Entries split
    /// with several people lose this participant from their split group, so
    /// the remaining members' shares grow. Entries this participant paid for
    /// are kept with their payer unchanged and listed in
    /// [`ParticipantRemoval::dangling_payer`].
    pub fn remove_participant(
        &mut self,
        name: &ParticipantName,
    ) -> Result<ParticipantRemoval, LedgerError> {
        let position = self
            .participants
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| LedgerError::UnknownParticipant(name.clone()))?;
        let participant = self.participants.remove(position);

        let mut deleted_expenses = Vec::new();
        let mut kept = Vec::with_capacity(self.expenses.len());
        let mut shrunk_expenses = Vec::new();
        let mut dangling_payer = Vec::new();

        for mut entry in self.expenses.drain(..) {
            let was_member = entry.remove_from_split(name);
            if entry.split_with().is_empty() {
                deleted_expenses.push(entry);
                continue;
            }
            if was_member {
                shrunk_expenses.push(kept.len());
            }
            if entry.payer() == name {
                dangling_payer.push(kept.len());
            }
            kept.push(entry);
        }
        self.expenses = kept;

        debug!(
            "removed participant {}: {} entries deleted, {} split groups shrunk",
            participant.name(),
            deleted_expenses.len(),
            shrunk_expenses.len()
        );
        if !dangling_payer.is_empty() {
            warn!(
                "{} entries are still paid by removed participant {}",
                dangling_payer.len(),
                participant.name()
            );
        }

        Ok(ParticipantRemoval {
            participant,
            deleted_expenses,
            shrunk_expenses,
            dangling_payer,
        })
    }

    /// Build and append an expense entry.
    pub fn add_expense<N>(
        &mut self,
        description: impl Into<String>,
        amount: Money,
        payer: impl Into<ParticipantName>,
        split_with: impl IntoIterator<Item = N>,
    ) -> Result<&ExpenseEntry, LedgerError>
    where
        N: Into<ParticipantName>,
    {
        let entry = ExpenseEntry::new(description, amount, payer, split_with)?;
        self.push_expense(entry)
    }

    /// Append an already-built expense entry.
    pub fn push_expense(&mut self, entry: ExpenseEntry) -> Result<&ExpenseEntry, LedgerError> {
        self.check_references(&entry)?;
        check_total(
            self.expenses
                .iter()
                .map(ExpenseEntry::amount)
                .chain(std::iter::once(entry.amount())),
        )?;
        debug!(
            "adding expense \"{}\" of {} paid by {}",
            entry.description(),
            entry.amount(),
            entry.payer()
        );
        self.expenses.push(entry);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Remove the entry at `index`, returning it.
    pub fn remove_expense(&mut self, index: usize) -> Result<ExpenseEntry, LedgerError> {
        self.check_index(index)?;
        Ok(self.expenses.remove(index))
    }

    /// Replace the entry at `index` as a whole, returning the old entry.
    ///
    /// The new entry is validated first; on error the ledger is unchanged.
    pub fn replace_expense(
        &mut self,
        index: usize,
        entry: ExpenseEntry,
    ) -> Result<ExpenseEntry, LedgerError> {
        self.check_index(index)?;
        self.check_references(&entry)?;
        check_total(
            self.expenses
                .iter()
                .enumerate()
                .map(|(i, e)| if i == index { entry.amount() } else { e.amount() }),
        )?;
        Ok(std::mem::replace(&mut self.expenses[index], entry))
    }

    /// Re-check every invariant of the ledger.
    ///
    /// Used when a ledger arrives from outside (storage, share links).
    pub fn validate(&self) -> Result<(), LedgerError> {
        for (i, participant) in self.participants.iter().enumerate() {
            if participant.name().is_blank() {
                return Err(LedgerError::EmptyName);
            }
            if self.participants[..i]
                .iter()
                .any(|p| p.name() == participant.name())
            {
                return Err(LedgerError::DuplicateName(participant.name().clone()));
            }
        }
        for entry in &self.expenses {
            self.check_references(entry)?;
        }
        check_total(self.expenses.iter().map(ExpenseEntry::amount))?;
        Ok(())
    }

    fn check_references(&self, entry: &ExpenseEntry) -> Result<(), LedgerError> {
        std::iter::once(entry.payer())
            .chain(entry.split_with())
            .find(|name| !self.contains(name))
            .map_or(Ok(()), |name| {
                Err(LedgerError::InvalidReference { name: name.clone() })
            })
    }

    fn check_index(&self, index: usize) -> Result<(), LedgerError> {
        if index >= self.expenses.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.expenses.len(),
            });
        }
        Ok(())
    }
}

/// Sum `amounts`, failing on the first one that takes the total past
/// [`MAX_BILL_TOTAL`].
fn check_total(amounts: impl IntoIterator<Item = Money>) -> Result<Money, LedgerError> {
    amounts.into_iter().try_fold(Money::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .filter(|sum| *sum <= MAX_BILL_TOTAL)
            .ok_or(LedgerError::InvalidAmount(AmountProblem::TooLarge(amount)))
    })
}
