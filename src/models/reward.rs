// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Rewards catalogue.

use serde::Serialize;

/// A reward that points can (eventually) be spent on.
#[derive(Debug, Clone, Serialize)]
pub struct Reward {
    pub name: &'static str,
    pub points: u32,
    pub description: &'static str,
}

/// Static rewards catalogue, cheapest first.
pub const CATALOGUE: [Reward; 3] = [
    Reward {
        name: "10% Discount at EcoCafe",
        points: 200,
        description: "Get a discount on your next visit to EcoCafe",
    },
    Reward {
        name: "Plant a Tree",
        points: 500,
        description: "We'll plant a tree on your behalf",
    },
    Reward {
        name: "Free Bus Pass (1 day)",
        points: 1000,
        description: "Enjoy free bus rides for a day",
    },
];

/// Catalogue entry annotated for a particular balance.
#[derive(Debug, Clone, Serialize)]
pub struct RewardOffer {
    #[serde(flatten)]
    pub reward: Reward,
    pub affordable: bool,
}

/// Mark each catalogue entry as affordable (or not) for `points`.
pub fn offers_for(points: f64) -> Vec<RewardOffer> {
    CATALOGUE
        .iter()
        .map(|reward| RewardOffer {
            reward: reward.clone(),
            affordable: points >= f64::from(reward.points),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offers_affordability() {
        let offers = offers_for(500.0);
        let flags: Vec<bool> = offers.iter().map(|o| o.affordable).collect();
        assert_eq!(flags, vec![true, true, false]);

        assert!(offers_for(0.0).iter().all(|o| !o.affordable));
    }
}
