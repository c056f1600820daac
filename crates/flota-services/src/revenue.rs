//! Revenue reporting service
//!
//! Aggregates stored reservations into monthly and yearly revenue reports.

use std::sync::Arc;

use flota_core::{
    models::{MonthlyRevenue, MonthlyRevenueDetailed, YearlyRevenue},
    traits::ReservationRepository,
    AppError, AppResult,
};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

/// Revenue reporting over stored reservations
pub struct RevenueService<R: ReservationRepository> {
    reservation_repo: Arc<R>,
}

impl<R: ReservationRepository> RevenueService<R> {
    /// Create a new revenue service
    pub fn new(reservation_repo: Arc<R>) -> Self {
        Self { reservation_repo }
    }

    /// Reject months outside the calendar range
    fn validate_month(month: u32) -> AppResult<()> {
        if !(1..=12).contains(&month) {
            return Err(AppError::InvalidMonth { month });
        }
        Ok(())
    }

    /// Revenue summary for one month.
    ///
    /// The total is aggregated by the store; the count comes from the
    /// month's stored rows.
    #[instrument(skip(self))]
    pub async fn monthly_revenue(&self, year: i32, month: u32) -> AppResult<MonthlyRevenue> {
        Self::validate_month(month)?;

        let (reservations, total) = futures::try_join!(
            self.reservation_repo.find_by_month(year, month),
            self.reservation_repo.monthly_revenue_sum(year, month),
        )?;

        debug!(
            "Month {}/{}: {} reservations totalling {}",
            month,
            year,
            reservations.len(),
            total
        );

        Ok(MonthlyRevenue::new(
            year,
            month,
            total,
            reservations.len() as i64,
        ))
    }

    /// Revenue for one month split into base, insurance and tax buckets.
    ///
    /// Each reservation's cost is recomputed from its stored components with
    /// the vehicle-rate fallback; the reported total is the sum of the three
    /// buckets.
    #[instrument(skip(self))]
    pub async fn monthly_revenue_detailed(
        &self,
        year: i32,
        month: u32,
    ) -> AppResult<MonthlyRevenueDetailed> {
        Self::validate_month(month)?;

        let reservations = self.reservation_repo.find_by_month(year, month).await?;

        let mut base_revenue = Decimal::ZERO;
        let mut insurance_revenue = Decimal::ZERO;
        let mut tax_revenue = Decimal::ZERO;

        for entry in &reservations {
            let breakdown = entry.cost_breakdown();
            base_revenue += breakdown.base;
            insurance_revenue += breakdown.insurance;
            tax_revenue += breakdown.tax;
        }

        debug!(
            "Month {}/{}: base {}, insurance {}, tax {}",
            month, year, base_revenue, insurance_revenue, tax_revenue
        );

        Ok(MonthlyRevenueDetailed::new(
            year,
            month,
            base_revenue,
            insurance_revenue,
            tax_revenue,
            reservations.len() as i64,
        ))
    }

    /// Month-by-month revenue for a whole year.
    ///
    /// The twelve months are computed concurrently and returned in calendar
    /// order, January first.
    #[instrument(skip(self))]
    pub async fn yearly_breakdown(&self, year: i32) -> AppResult<YearlyRevenue> {
        let months =
            try_join_all((1..=12).map(|month| self.monthly_revenue(year, month))).await?;

        let total_revenue: Decimal = months.iter().map(|m| m.total_revenue).sum();

        info!("Yearly breakdown for {}: total {}", year, total_revenue);

        Ok(YearlyRevenue {
            year,
            months,
            total_revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flota_core::models::{Reservation, ReservationWithRate};
    use flota_core::traits::Repository;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockReservationRepository {
        by_month: HashMap<u32, Vec<ReservationWithRate>>,
        sums: HashMap<u32, Decimal>,
    }

    #[async_trait]
    impl Repository<Reservation, i32> for MockReservationRepository {
        async fn find_by_id(&self, _id: i32) -> AppResult<Option<Reservation>> {
            Ok(None)
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Reservation>> {
            Ok(vec![])
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(0)
        }

        async fn create(&self, entity: &Reservation) -> AppResult<Reservation> {
            Ok(entity.clone())
        }

        async fn update(&self, entity: &Reservation) -> AppResult<Reservation> {
            Ok(entity.clone())
        }

        async fn delete(&self, _id: i32) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl ReservationRepository for MockReservationRepository {
        async fn find_by_number(&self, _number: i32) -> AppResult<Option<Reservation>> {
            Ok(None)
        }

        async fn delete_by_number(&self, _number: i32) -> AppResult<bool> {
            Ok(false)
        }

        async fn update_damage(
            &self,
            _number: i32,
            _description: &str,
        ) -> AppResult<Option<Reservation>> {
            Ok(None)
        }

        async fn find_history(&self, _customer_id: i32) -> AppResult<Vec<Reservation>> {
            Ok(vec![])
        }

        async fn find_by_month(
            &self,
            _year: i32,
            month: u32,
        ) -> AppResult<Vec<ReservationWithRate>> {
            Ok(self.by_month.get(&month).cloned().unwrap_or_default())
        }

        async fn monthly_revenue_sum(&self, _year: i32, month: u32) -> AppResult<Decimal> {
            Ok(self.sums.get(&month).copied().unwrap_or(Decimal::ZERO))
        }

        async fn year_revenue_sum(&self, _year: i32) -> AppResult<Decimal> {
            Ok(self.sums.values().copied().sum())
        }
    }

    fn rental(
        days: i32,
        rate: Option<Decimal>,
        vehicle_rate: Option<Decimal>,
        insurance_vehicle: Option<Decimal>,
        insurance_third_party: Option<Decimal>,
        tax: Option<Decimal>,
    ) -> ReservationWithRate {
        let reservation = Reservation {
            rental_days: Some(days),
            daily_rate: rate,
            insurance_vehicle,
            insurance_third_party,
            tax_amount: tax,
            ..Reservation::default()
        };
        ReservationWithRate {
            reservation,
            vehicle_rate,
        }
    }

    #[tokio::test]
    async fn test_monthly_revenue_average() {
        let mut repo = MockReservationRepository::default();
        repo.by_month.insert(
            3,
            vec![
                rental(5, Some(dec!(100)), None, None, None, None),
                rental(2, Some(dec!(100)), None, None, None, None),
                rental(2, Some(dec!(100)), None, None, None, None),
            ],
        );
        repo.sums.insert(3, dec!(900));
        let svc = RevenueService::new(Arc::new(repo));

        let summary = svc.monthly_revenue(2024, 3).await.unwrap();

        assert_eq!(summary.total_reservations, 3);
        assert_eq!(summary.total_revenue, dec!(900));
        assert_eq!(summary.average_per_reservation, dec!(300));
        assert_eq!(summary.month_name, "March");
    }

    #[tokio::test]
    async fn test_monthly_revenue_empty_month() {
        let svc = RevenueService::new(Arc::new(MockReservationRepository::default()));

        let summary = svc.monthly_revenue(2024, 2).await.unwrap();

        assert_eq!(summary.total_reservations, 0);
        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.average_per_reservation, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_monthly_revenue_rejects_invalid_month() {
        let svc = RevenueService::new(Arc::new(MockReservationRepository::default()));

        for month in [0, 13] {
            let err = svc.monthly_revenue(2024, month).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidMonth { .. }));
        }
    }

    #[tokio::test]
    async fn test_detailed_breakdown_buckets() {
        let mut repo = MockReservationRepository::default();
        repo.by_month.insert(
            1,
            vec![rental(
                4,
                Some(dec!(100)),
                None,
                Some(dec!(50)),
                Some(dec!(25)),
                Some(dec!(20)),
            )],
        );
        let svc = RevenueService::new(Arc::new(repo));

        let report = svc.monthly_revenue_detailed(2024, 1).await.unwrap();

        assert_eq!(report.base_revenue, dec!(400));
        assert_eq!(report.insurance_revenue, dec!(75));
        assert_eq!(report.tax_revenue, dec!(20));
        assert_eq!(report.total_revenue, dec!(495));
        assert_eq!(report.total_reservations, 1);
    }

    #[tokio::test]
    async fn test_detailed_breakdown_uses_vehicle_rate_fallback() {
        let mut repo = MockReservationRepository::default();
        repo.by_month.insert(
            6,
            vec![
                // No rate override: the joined vehicle rate applies
                rental(2, None, Some(dec!(60)), None, None, None),
                rental(3, Some(dec!(80)), Some(dec!(60)), None, None, None),
            ],
        );
        let svc = RevenueService::new(Arc::new(repo));

        let report = svc.monthly_revenue_detailed(2024, 6).await.unwrap();

        // 2 × 60 + 3 × 80
        assert_eq!(report.base_revenue, dec!(360));
        assert_eq!(report.total_revenue, dec!(360));
    }

    #[tokio::test]
    async fn test_detailed_rejects_invalid_month() {
        let svc = RevenueService::new(Arc::new(MockReservationRepository::default()));

        let err = svc.monthly_revenue_detailed(2024, 0).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidMonth { month: 0 }));
    }

    #[tokio::test]
    async fn test_yearly_breakdown_covers_all_months_in_order() {
        let mut repo = MockReservationRepository::default();
        repo.by_month
            .insert(3, vec![rental(5, Some(dec!(100)), None, None, None, None)]);
        repo.sums.insert(3, dec!(500));
        repo.by_month
            .insert(7, vec![rental(2, Some(dec!(90)), None, None, None, None)]);
        repo.sums.insert(7, dec!(180));
        let svc = RevenueService::new(Arc::new(repo));

        let breakdown = svc.yearly_breakdown(2024).await.unwrap();

        assert_eq!(breakdown.months.len(), 12);
        for (index, month) in breakdown.months.iter().enumerate() {
            assert_eq!(month.month, index as u32 + 1);
        }
        assert_eq!(breakdown.total_revenue, dec!(680));
        assert_eq!(breakdown.months[2].total_revenue, dec!(500));
        assert_eq!(breakdown.months[6].average_per_reservation, dec!(180));
    }
}
