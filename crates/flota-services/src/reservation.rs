//! Reservation lifecycle service
//!
//! Orchestrates vehicle bookings: availability checks, customer resolution,
//! reservation number allocation, cancellation and damage reports.

use std::sync::Arc;

use chrono::NaiveDate;
use flota_core::{
    models::{LoggedUser, Reservation},
    traits::{CustomerRepository, Repository, ReservationRepository, VehicleRepository},
    AppError, AppResult,
};
use rand_core::{OsRng, RngCore};
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::constants::{NUMBER_RETRY_ATTEMPTS, RESERVATION_NUMBER_MAX, RESERVATION_NUMBER_MIN};

/// Details needed to open a new reservation
///
/// The customer is resolved from the logged-in user's email, never taken
/// from the request.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub vehicle_id: i32,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    pub rental_days: Option<i32>,
    pub daily_rate: Option<Decimal>,
    pub rate_type: Option<String>,
    pub insurance_vehicle: Option<Decimal>,
    pub insurance_third_party: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
}

/// Fields of an existing reservation that staff may change
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    pub rental_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub rental_days: Option<i32>,
    pub daily_rate: Option<Decimal>,
    pub rate_type: Option<String>,
    pub insurance_vehicle: Option<Decimal>,
    pub insurance_third_party: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub damage_description: Option<String>,
}

/// Coordinates the reservation lifecycle end-to-end
///
/// Generic over its repositories so the booking rules can be tested against
/// in-memory fakes.
pub struct ReservationService<
    V: VehicleRepository,
    C: CustomerRepository,
    R: ReservationRepository,
> {
    vehicle_repo: Arc<V>,
    customer_repo: Arc<C>,
    reservation_repo: Arc<R>,
}

impl<V: VehicleRepository, C: CustomerRepository, R: ReservationRepository>
    ReservationService<V, C, R>
{
    /// Create a new reservation service
    pub fn new(vehicle_repo: Arc<V>, customer_repo: Arc<C>, reservation_repo: Arc<R>) -> Self {
        Self {
            vehicle_repo,
            customer_repo,
            reservation_repo,
        }
    }

    /// Draw a candidate reservation number
    fn generate_reservation_number() -> i32 {
        let span = (RESERVATION_NUMBER_MAX - RESERVATION_NUMBER_MIN + 1) as u32;
        RESERVATION_NUMBER_MIN + (OsRng.next_u32() % span) as i32
    }

    /// Open a reservation for the logged-in user.
    ///
    /// The vehicle is claimed with a conditional update before the
    /// reservation row is written, so two concurrent bookings for the same
    /// vehicle cannot both succeed. A failed insert gives the claim back.
    #[instrument(skip(self, user, request), fields(vehicle_id = request.vehicle_id))]
    pub async fn create_reservation(
        &self,
        user: &LoggedUser,
        request: BookingRequest,
    ) -> AppResult<Reservation> {
        if !user.is_authenticated() {
            return Err(AppError::Unauthorized(
                "User is not authenticated".to_string(),
            ));
        }

        let vehicle = self
            .vehicle_repo
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| {
                warn!("Vehicle {} does not exist", request.vehicle_id);
                AppError::VehicleNotFound(request.vehicle_id.to_string())
            })?;

        // Fast rejection before any write
        if vehicle.reserved {
            debug!("Vehicle {} is already reserved", vehicle.id);
            return Err(AppError::VehicleUnavailable(format!(
                "Vehicle {} is already reserved",
                vehicle.id
            )));
        }

        let customer = self
            .customer_repo
            .find_by_email(&user.email)
            .await?
            .ok_or_else(|| {
                warn!("No customer profile for user {}", user.email);
                AppError::CustomerNotFound(user.email.clone())
            })?;

        // Claim the vehicle. Losing the race to a concurrent booking is a
        // client error, not a server fault.
        if !self.vehicle_repo.mark_reserved(vehicle.id).await? {
            debug!("Vehicle {} was claimed by a concurrent booking", vehicle.id);
            return Err(AppError::VehicleUnavailable(format!(
                "Vehicle {} is already reserved",
                vehicle.id
            )));
        }

        let mut reservation = Reservation::new(
            customer.id,
            vehicle.id,
            request.rental_date,
            request.return_date,
        );
        reservation.rental_days = request.rental_days;
        reservation.daily_rate = request.daily_rate;
        reservation.rate_type = request.rate_type;
        reservation.insurance_vehicle = request.insurance_vehicle;
        reservation.insurance_third_party = request.insurance_third_party;
        reservation.tax_amount = request.tax_amount;

        let mut attempt = 0;
        let created = loop {
            attempt += 1;
            reservation.reservation_number = Self::generate_reservation_number();

            match self.reservation_repo.create(&reservation).await {
                Ok(created) => break created,
                Err(AppError::AlreadyExists(_)) if attempt < NUMBER_RETRY_ATTEMPTS => {
                    warn!(
                        "Reservation number {} already taken (attempt {}/{})",
                        reservation.reservation_number, attempt, NUMBER_RETRY_ATTEMPTS
                    );
                }
                Err(e) => {
                    // The booking was not stored, so give the claim back.
                    self.release_claim(vehicle.id).await;
                    return Err(match e {
                        AppError::AlreadyExists(_) => {
                            error!(
                                "No free reservation number after {} attempts",
                                NUMBER_RETRY_ATTEMPTS
                            );
                            AppError::Internal(format!(
                                "No free reservation number after {} attempts",
                                NUMBER_RETRY_ATTEMPTS
                            ))
                        }
                        other => other,
                    });
                }
            }
        };

        info!(
            "Reservation {} created for customer {} on vehicle {}",
            created.reservation_number, customer.id, vehicle.id
        );
        Ok(created)
    }

    /// Best-effort rollback of a vehicle claim after a failed insert
    async fn release_claim(&self, vehicle_id: i32) {
        match self.vehicle_repo.release(vehicle_id).await {
            Ok(true) => debug!("Released claim on vehicle {}", vehicle_id),
            Ok(false) => warn!("Vehicle {} was not flagged as reserved", vehicle_id),
            Err(e) => error!("Failed to release vehicle {}: {}", vehicle_id, e),
        }
    }

    /// Cancel a reservation by its public number.
    ///
    /// Only the booking row is removed; the vehicle's reserved flag is
    /// managed through vehicle updates.
    #[instrument(skip(self, user))]
    pub async fn cancel_reservation(&self, user: &LoggedUser, number: i32) -> AppResult<()> {
        if !user.is_authenticated() {
            return Err(AppError::Unauthorized(
                "User is not authenticated".to_string(),
            ));
        }

        let deleted = self.reservation_repo.delete_by_number(number).await?;
        if !deleted {
            return Err(AppError::ReservationNotFound(number.to_string()));
        }

        info!("Reservation {} cancelled", number);
        Ok(())
    }

    /// Attach a damage report to a reservation.
    ///
    /// Staff only; the repository is never touched for callers without the
    /// required role.
    #[instrument(skip(self, user, description))]
    pub async fn register_damage(
        &self,
        user: &LoggedUser,
        number: i32,
        description: &str,
    ) -> AppResult<Reservation> {
        if !user.is_staff() {
            warn!("User {} may not register damage", user.email);
            return Err(AppError::Unauthorized(
                "User does not have the required role".to_string(),
            ));
        }

        let updated = self
            .reservation_repo
            .update_damage(number, description)
            .await?
            .ok_or_else(|| AppError::ReservationNotFound(number.to_string()))?;

        info!("Damage registered on reservation {}", number);
        Ok(updated)
    }

    /// Rental history for a customer, newest rental first
    #[instrument(skip(self, user))]
    pub async fn reservation_history(
        &self,
        user: &LoggedUser,
        customer_id: i32,
    ) -> AppResult<Vec<Reservation>> {
        if !user.is_authenticated() {
            return Err(AppError::Unauthorized(
                "User is not authenticated".to_string(),
            ));
        }

        let history = self.reservation_repo.find_history(customer_id).await?;
        if history.is_empty() {
            return Err(AppError::NotFound(format!(
                "No reservations found for customer {}",
                customer_id
            )));
        }

        Ok(history)
    }

    /// All reservations, most recent rental first (staff only)
    #[instrument(skip(self, user))]
    pub async fn list_reservations(
        &self,
        user: &LoggedUser,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Reservation>> {
        if !user.is_staff() {
            return Err(AppError::Unauthorized(
                "User does not have the required role".to_string(),
            ));
        }

        let reservations = self.reservation_repo.find_all(limit, offset).await?;
        if reservations.is_empty() {
            return Err(AppError::NotFound("No reservations found".to_string()));
        }

        Ok(reservations)
    }

    /// Apply staff changes to an existing reservation
    #[instrument(skip(self, user, changes))]
    pub async fn update_reservation(
        &self,
        user: &LoggedUser,
        number: i32,
        changes: BookingUpdate,
    ) -> AppResult<Reservation> {
        if !user.is_staff() {
            return Err(AppError::Unauthorized(
                "User does not have the required role".to_string(),
            ));
        }

        let mut reservation = self
            .reservation_repo
            .find_by_number(number)
            .await?
            .ok_or_else(|| AppError::ReservationNotFound(number.to_string()))?;

        if let Some(rental_date) = changes.rental_date {
            reservation.rental_date = rental_date;
        }
        if let Some(return_date) = changes.return_date {
            reservation.return_date = return_date;
        }
        if let Some(rental_days) = changes.rental_days {
            reservation.rental_days = Some(rental_days);
        }
        if let Some(daily_rate) = changes.daily_rate {
            reservation.daily_rate = Some(daily_rate);
        }
        if let Some(rate_type) = changes.rate_type {
            reservation.rate_type = Some(rate_type);
        }
        if let Some(insurance_vehicle) = changes.insurance_vehicle {
            reservation.insurance_vehicle = Some(insurance_vehicle);
        }
        if let Some(insurance_third_party) = changes.insurance_third_party {
            reservation.insurance_third_party = Some(insurance_third_party);
        }
        if let Some(tax_amount) = changes.tax_amount {
            reservation.tax_amount = Some(tax_amount);
        }
        if let Some(damage_description) = changes.damage_description {
            reservation.damage_description = Some(damage_description);
        }

        let updated = self.reservation_repo.update(&reservation).await?;
        info!("Reservation {} updated", number);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flota_core::models::{Customer, ReservationWithRate, UserRole, Vehicle};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockVehicleRepository {
        vehicles: Mutex<HashMap<i32, Vehicle>>,
        claim_calls: AtomicUsize,
        refuse_claims: bool,
    }

    impl MockVehicleRepository {
        fn with_vehicle(vehicle: Vehicle) -> Self {
            let repo = Self::default();
            repo.vehicles.lock().unwrap().insert(vehicle.id, vehicle);
            repo
        }

        fn reserved_flag(&self, id: i32) -> bool {
            self.vehicles
                .lock()
                .unwrap()
                .get(&id)
                .map(|v| v.reserved)
                .unwrap_or(false)
        }
    }

    #[async_trait]
    impl Repository<Vehicle, i32> for MockVehicleRepository {
        async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
            Ok(self.vehicles.lock().unwrap().get(&id).cloned())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Vehicle>> {
            Ok(vec![])
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.vehicles.lock().unwrap().len() as i64)
        }

        async fn create(&self, entity: &Vehicle) -> AppResult<Vehicle> {
            Ok(entity.clone())
        }

        async fn update(&self, entity: &Vehicle) -> AppResult<Vehicle> {
            Ok(entity.clone())
        }

        async fn delete(&self, _id: i32) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl VehicleRepository for MockVehicleRepository {
        async fn find_by_plate(&self, _plate: &str) -> AppResult<Option<Vehicle>> {
            Ok(None)
        }

        async fn find_available(&self) -> AppResult<Vec<Vehicle>> {
            Ok(vec![])
        }

        async fn count_available(&self) -> AppResult<i64> {
            Ok(0)
        }

        async fn mark_reserved(&self, id: i32) -> AppResult<bool> {
            self.claim_calls.fetch_add(1, Ordering::SeqCst);
            if self.refuse_claims {
                return Ok(false);
            }
            let mut vehicles = self.vehicles.lock().unwrap();
            match vehicles.get_mut(&id) {
                Some(vehicle) if !vehicle.reserved => {
                    vehicle.reserved = true;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn release(&self, id: i32) -> AppResult<bool> {
            let mut vehicles = self.vehicles.lock().unwrap();
            match vehicles.get_mut(&id) {
                Some(vehicle) if vehicle.reserved => {
                    vehicle.reserved = false;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    struct MockCustomerRepository {
        customer: Option<Customer>,
    }

    #[async_trait]
    impl Repository<Customer, i32> for MockCustomerRepository {
        async fn find_by_id(&self, _id: i32) -> AppResult<Option<Customer>> {
            Ok(self.customer.clone())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Customer>> {
            Ok(vec![])
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(0)
        }

        async fn create(&self, entity: &Customer) -> AppResult<Customer> {
            Ok(entity.clone())
        }

        async fn update(&self, entity: &Customer) -> AppResult<Customer> {
            Ok(entity.clone())
        }

        async fn delete(&self, _id: i32) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl CustomerRepository for MockCustomerRepository {
        async fn find_by_email(&self, _email: &str) -> AppResult<Option<Customer>> {
            Ok(self.customer.clone())
        }
    }

    #[derive(Default)]
    struct MockReservationRepository {
        stored: Mutex<Vec<Reservation>>,
        collisions_left: AtomicUsize,
        create_calls: AtomicUsize,
        damage_calls: AtomicUsize,
        fail_create: bool,
    }

    impl MockReservationRepository {
        fn colliding(collisions: usize) -> Self {
            let repo = Self::default();
            repo.collisions_left.store(collisions, Ordering::SeqCst);
            repo
        }

        fn failing() -> Self {
            Self {
                fail_create: true,
                ..Self::default()
            }
        }

        fn with_reservations(reservations: Vec<Reservation>) -> Self {
            let repo = Self::default();
            *repo.stored.lock().unwrap() = reservations;
            repo
        }
    }

    #[async_trait]
    impl Repository<Reservation, i32> for MockReservationRepository {
        async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>> {
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Reservation>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.stored.lock().unwrap().len() as i64)
        }

        async fn create(&self, entity: &Reservation) -> AppResult<Reservation> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(AppError::Database("insert failed".to_string()));
            }
            if self.collisions_left.load(Ordering::SeqCst) > 0 {
                self.collisions_left.fetch_sub(1, Ordering::SeqCst);
                return Err(AppError::AlreadyExists(format!(
                    "Reservation number {} already exists",
                    entity.reservation_number
                )));
            }
            let mut stored = self.stored.lock().unwrap();
            let mut created = entity.clone();
            created.id = stored.len() as i32 + 1;
            stored.push(created.clone());
            Ok(created)
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
        async fn find_by_number(&self, number: i32) -> AppResult<Option<Reservation>> {
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.reservation_number == number)
                .cloned())
        }

        async fn delete_by_number(&self, number: i32) -> AppResult<bool> {
            let mut stored = self.stored.lock().unwrap();
            let before = stored.len();
            stored.retain(|r| r.reservation_number != number);
            Ok(stored.len() < before)
        }

        async fn update_damage(
            &self,
            number: i32,
            description: &str,
        ) -> AppResult<Option<Reservation>> {
            self.damage_calls.fetch_add(1, Ordering::SeqCst);
            let mut stored = self.stored.lock().unwrap();
            Ok(stored
                .iter_mut()
                .find(|r| r.reservation_number == number)
                .map(|r| {
                    r.damage_description = Some(description.to_string());
                    r.clone()
                }))
        }

        async fn find_history(&self, customer_id: i32) -> AppResult<Vec<Reservation>> {
            let mut history: Vec<Reservation> = self
                .stored
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.customer_id == customer_id)
                .cloned()
                .collect();
            history.sort_by(|a, b| b.rental_date.cmp(&a.rental_date));
            Ok(history)
        }

        async fn find_by_month(
            &self,
            _year: i32,
            _month: u32,
        ) -> AppResult<Vec<ReservationWithRate>> {
            Ok(vec![])
        }

        async fn monthly_revenue_sum(&self, _year: i32, _month: u32) -> AppResult<Decimal> {
            Ok(Decimal::ZERO)
        }

        async fn year_revenue_sum(&self, _year: i32) -> AppResult<Decimal> {
            Ok(Decimal::ZERO)
        }
    }

    fn test_vehicle(id: i32, reserved: bool) -> Vehicle {
        Vehicle {
            id,
            reserved,
            daily_rate: Some(dec!(100)),
            ..Vehicle::default()
        }
    }

    fn test_customer() -> Customer {
        Customer {
            id: 7,
            email: "ana@flota.local".to_string(),
            ..Customer::default()
        }
    }

    fn test_reservation(number: i32, customer_id: i32, rental_date: NaiveDate) -> Reservation {
        let mut reservation =
            Reservation::new(customer_id, 3, rental_date, rental_date + chrono::Days::new(5));
        reservation.id = number - 100_000;
        reservation.reservation_number = number;
        reservation
    }

    fn renter() -> LoggedUser {
        LoggedUser::new(1, "Ana", "ana@flota.local", UserRole::CommonUser)
    }

    fn employee() -> LoggedUser {
        LoggedUser::new(2, "Luis", "luis@flota.local", UserRole::Employee)
    }

    fn booking_request(vehicle_id: i32) -> BookingRequest {
        BookingRequest {
            vehicle_id,
            rental_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            rental_days: None,
            daily_rate: None,
            rate_type: None,
            insurance_vehicle: None,
            insurance_third_party: None,
            tax_amount: None,
        }
    }

    fn service(
        vehicle_repo: Arc<MockVehicleRepository>,
        customer: Option<Customer>,
        reservation_repo: Arc<MockReservationRepository>,
    ) -> ReservationService<MockVehicleRepository, MockCustomerRepository, MockReservationRepository>
    {
        ReservationService::new(
            vehicle_repo,
            Arc::new(MockCustomerRepository { customer }),
            reservation_repo,
        )
    }

    #[tokio::test]
    async fn test_create_reservation() {
        let vehicles = Arc::new(MockVehicleRepository::with_vehicle(test_vehicle(3, false)));
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles.clone(), Some(test_customer()), reservations.clone());

        let created = svc
            .create_reservation(&renter(), booking_request(3))
            .await
            .unwrap();

        assert_eq!(created.customer_id, 7);
        assert_eq!(created.vehicle_id, 3);
        assert!(created.reservation_number >= RESERVATION_NUMBER_MIN);
        assert!(created.reservation_number <= RESERVATION_NUMBER_MAX);
        assert!(vehicles.reserved_flag(3));
        assert_eq!(reservations.stored.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_reservation_requires_authentication() {
        let vehicles = Arc::new(MockVehicleRepository::with_vehicle(test_vehicle(3, false)));
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles.clone(), Some(test_customer()), reservations.clone());

        let err = svc
            .create_reservation(&LoggedUser::anonymous(), booking_request(3))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(vehicles.claim_calls.load(Ordering::SeqCst), 0);
        assert!(reservations.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_reservation_unknown_vehicle() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc
            .create_reservation(&renter(), booking_request(99))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::VehicleNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_reservation_rejects_reserved_vehicle() {
        let vehicles = Arc::new(MockVehicleRepository::with_vehicle(test_vehicle(3, true)));
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles.clone(), Some(test_customer()), reservations.clone());

        let err = svc
            .create_reservation(&renter(), booking_request(3))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::VehicleUnavailable(_)));
        // Rejected before any write: no claim attempted, nothing stored
        assert_eq!(vehicles.claim_calls.load(Ordering::SeqCst), 0);
        assert!(reservations.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_reservation_unknown_customer() {
        let vehicles = Arc::new(MockVehicleRepository::with_vehicle(test_vehicle(3, false)));
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, None, reservations);

        let err = svc
            .create_reservation(&renter(), booking_request(3))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CustomerNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_reservation_lost_claim_race() {
        let vehicles = Arc::new(MockVehicleRepository {
            refuse_claims: true,
            ..MockVehicleRepository::default()
        });
        vehicles
            .vehicles
            .lock()
            .unwrap()
            .insert(3, test_vehicle(3, false));
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations.clone());

        let err = svc
            .create_reservation(&renter(), booking_request(3))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::VehicleUnavailable(_)));
        assert!(reservations.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_reservation_retries_taken_numbers() {
        let vehicles = Arc::new(MockVehicleRepository::with_vehicle(test_vehicle(3, false)));
        let reservations = Arc::new(MockReservationRepository::colliding(2));
        let svc = service(vehicles.clone(), Some(test_customer()), reservations.clone());

        let created = svc
            .create_reservation(&renter(), booking_request(3))
            .await
            .unwrap();

        assert_eq!(reservations.create_calls.load(Ordering::SeqCst), 3);
        assert!(created.reservation_number >= RESERVATION_NUMBER_MIN);
        assert!(vehicles.reserved_flag(3));
    }

    #[tokio::test]
    async fn test_create_reservation_gives_up_after_retry_budget() {
        let vehicles = Arc::new(MockVehicleRepository::with_vehicle(test_vehicle(3, false)));
        let reservations = Arc::new(MockReservationRepository::colliding(3));
        let svc = service(vehicles.clone(), Some(test_customer()), reservations.clone());

        let err = svc
            .create_reservation(&renter(), booking_request(3))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(reservations.create_calls.load(Ordering::SeqCst), 3);
        // The claim was rolled back
        assert!(!vehicles.reserved_flag(3));
    }

    #[tokio::test]
    async fn test_create_reservation_releases_claim_on_insert_failure() {
        let vehicles = Arc::new(MockVehicleRepository::with_vehicle(test_vehicle(3, false)));
        let reservations = Arc::new(MockReservationRepository::failing());
        let svc = service(vehicles.clone(), Some(test_customer()), reservations);

        let err = svc
            .create_reservation(&renter(), booking_request(3))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert!(!vehicles.reserved_flag(3));
    }

    #[tokio::test]
    async fn test_cancel_reservation() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let rental_date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let reservations = Arc::new(MockReservationRepository::with_reservations(vec![
            test_reservation(123456, 7, rental_date),
        ]));
        let svc = service(vehicles, Some(test_customer()), reservations.clone());

        svc.cancel_reservation(&renter(), 123456).await.unwrap();

        assert!(reservations.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_reservation_not_found() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc.cancel_reservation(&renter(), 999999).await.unwrap_err();

        assert!(matches!(err, AppError::ReservationNotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_reservation_requires_authentication() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc
            .cancel_reservation(&LoggedUser::anonymous(), 123456)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_register_damage_requires_staff_role() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let rental_date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let reservations = Arc::new(MockReservationRepository::with_reservations(vec![
            test_reservation(123456, 7, rental_date),
        ]));
        let svc = service(vehicles, Some(test_customer()), reservations.clone());

        let err = svc
            .register_damage(&renter(), 123456, "Scratched door")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
        // The repository was never consulted
        assert_eq!(reservations.damage_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_damage_as_employee() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let rental_date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let reservations = Arc::new(MockReservationRepository::with_reservations(vec![
            test_reservation(123456, 7, rental_date),
        ]));
        let svc = service(vehicles, Some(test_customer()), reservations);

        let updated = svc
            .register_damage(&employee(), 123456, "Scratched door")
            .await
            .unwrap();

        assert_eq!(updated.damage_description.as_deref(), Some("Scratched door"));
    }

    #[tokio::test]
    async fn test_register_damage_unknown_reservation() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc
            .register_damage(&employee(), 999999, "Scratched door")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReservationNotFound(_)));
    }

    #[tokio::test]
    async fn test_reservation_history_newest_first() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::with_reservations(vec![
            test_reservation(100001, 7, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            test_reservation(100002, 7, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()),
            test_reservation(100003, 7, NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()),
            test_reservation(100004, 8, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
        ]));
        let svc = service(vehicles, Some(test_customer()), reservations);

        let history = svc.reservation_history(&renter(), 7).await.unwrap();

        let numbers: Vec<i32> = history.iter().map(|r| r.reservation_number).collect();
        assert_eq!(numbers, vec![100002, 100003, 100001]);
    }

    #[tokio::test]
    async fn test_reservation_history_empty_is_not_found() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc.reservation_history(&renter(), 7).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_reservations_requires_staff_role() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let rental_date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let reservations = Arc::new(MockReservationRepository::with_reservations(vec![
            test_reservation(123456, 7, rental_date),
        ]));
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc
            .list_reservations(&renter(), 50, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_list_reservations_empty_is_not_found() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc
            .list_reservations(&employee(), 50, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_reservation_applies_changes() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let rental_date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let reservations = Arc::new(MockReservationRepository::with_reservations(vec![
            test_reservation(123456, 7, rental_date),
        ]));
        let svc = service(vehicles, Some(test_customer()), reservations);

        let changes = BookingUpdate {
            daily_rate: Some(dec!(120)),
            tax_amount: Some(dec!(18)),
            ..BookingUpdate::default()
        };
        let updated = svc
            .update_reservation(&employee(), 123456, changes)
            .await
            .unwrap();

        assert_eq!(updated.daily_rate, Some(dec!(120)));
        assert_eq!(updated.tax_amount, Some(dec!(18)));
        // Untouched fields keep their stored values
        assert_eq!(updated.rental_date, rental_date);
    }

    #[tokio::test]
    async fn test_update_reservation_requires_staff_role() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc
            .update_reservation(&renter(), 123456, BookingUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_update_reservation_not_found() {
        let vehicles = Arc::new(MockVehicleRepository::default());
        let reservations = Arc::new(MockReservationRepository::default());
        let svc = service(vehicles, Some(test_customer()), reservations);

        let err = svc
            .update_reservation(&employee(), 999999, BookingUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReservationNotFound(_)));
    }

    #[test]
    fn test_generate_reservation_number_in_range() {
        for _ in 0..100 {
            let number = ReservationService::<
                MockVehicleRepository,
                MockCustomerRepository,
                MockReservationRepository,
            >::generate_reservation_number();
            assert!((RESERVATION_NUMBER_MIN..=RESERVATION_NUMBER_MAX).contains(&number));
        }
    }
}
