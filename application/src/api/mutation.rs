//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money, Percent};
use juniper::{graphql_object, Nullable};
use service::{command, Command as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Adds a new available `Billboard` to the inventory.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createBillboard",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn create_billboard(
        name: api::billboard::Name,
        landmark: Option<api::billboard::Landmark>,
        size: api::billboard::Size,
        level: api::billboard::Level,
        municipality: Option<api::billboard::Municipality>,
        city: Option<api::billboard::City>,
        district: Option<api::billboard::District>,
        coordinates: api::billboard::Coordinates,
        price: Money,
        design_url: Option<api::billboard::ImageUrl>,
        installation_url: Option<api::billboard::ImageUrl>,
        ctx: &Context,
    ) -> Result<api::Billboard, Error> {
        ctx.service()
            .execute(command::CreateBillboard {
                name: name.into(),
                landmark: landmark.map(Into::into),
                size: size.into(),
                level: level.into(),
                municipality: municipality.map(Into::into),
                city: city.map(Into::into),
                district: district.map(Into::into),
                coordinates: coordinates.into(),
                price,
                design_url: design_url.map(Into::into),
                installation_url: installation_url.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `Billboard`.
    ///
    /// Omitted fields stay untouched, while optional fields explicitly set to
    /// `null` are cleared.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BILLBOARD_NOT_EXISTS` - the `Billboard` with the specified ID does
    ///                            not exist;
    /// - `BILLBOARD_REMOVED` - the `Billboard` is removed from the inventory.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateBillboard",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn update_billboard(
        id: api::billboard::Id,
        name: Option<api::billboard::Name>,
        landmark: Nullable<api::billboard::Landmark>,
        size: Option<api::billboard::Size>,
        level: Option<api::billboard::Level>,
        municipality: Nullable<api::billboard::Municipality>,
        city: Nullable<api::billboard::City>,
        district: Nullable<api::billboard::District>,
        coordinates: Option<api::billboard::Coordinates>,
        price: Option<Money>,
        design_url: Nullable<api::billboard::ImageUrl>,
        installation_url: Nullable<api::billboard::ImageUrl>,
        ctx: &Context,
    ) -> Result<api::Billboard, Error> {
        ctx.service()
            .execute(command::UpdateBillboard {
                billboard_id: id.into(),
                name: name.map(Into::into),
                landmark: clearable(landmark),
                size: size.map(Into::into),
                level: level.map(Into::into),
                municipality: clearable(municipality),
                city: clearable(city),
                district: clearable(district),
                coordinates: coordinates.map(Into::into),
                price,
                design_url: clearable(design_url),
                installation_url: clearable(installation_url),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Takes the `Billboard` out of the inventory.
    ///
    /// Removing an already removed `Billboard` is a no-op.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BILLBOARD_NOT_EXISTS` - the `Billboard` with the specified ID does
    ///                            not exist;
    /// - `BILLBOARD_RENTED` - the `Billboard` is rented by a `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeBillboard",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_billboard(
        id: api::billboard::Id,
        ctx: &Context,
    ) -> Result<api::Billboard, Error> {
        ctx.service()
            .execute(command::RemoveBillboard {
                billboard_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Puts the `Billboard` under maintenance.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BILLBOARD_NOT_EXISTS` - the `Billboard` with the specified ID does
    ///                            not exist;
    /// - `BILLBOARD_REMOVED` - the `Billboard` is removed from the inventory;
    /// - `ALREADY_IN_MAINTENANCE` - the `Billboard` is already under
    ///                              maintenance.
    #[tracing::instrument(
        skip_all,
        fields(
            billboard_id = %billboard_id,
            gql.name = "startMaintenance",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn start_maintenance(
        billboard_id: api::billboard::Id,
        kind: api::maintenance::Kind,
        description: api::maintenance::Description,
        cost: Option<Money>,
        ctx: &Context,
    ) -> Result<api::Record, Error> {
        ctx.service()
            .execute(command::StartMaintenance {
                billboard_id: billboard_id.into(),
                kind: kind.into(),
                description: description.into(),
                cost,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Completes the maintenance, returning the `Billboard` to service.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_RECORD_NOT_EXISTS` - the `MaintenanceRecord` with the
    ///                                     specified ID does not exist;
    /// - `MAINTENANCE_ALREADY_COMPLETED` - the maintenance is completed
    ///                                     already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "completeMaintenance",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn complete_maintenance(
        id: api::maintenance::Id,
        cost: Option<Money>,
        ctx: &Context,
    ) -> Result<api::Record, Error> {
        ctx.service()
            .execute(command::CompleteMaintenance {
                record_id: id.into(),
                cost,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Rents the `Billboard`s out by a new `Contract`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_BILLBOARDS` - no `Billboard`s provided;
    /// - `INVALID_PERIOD` - `endsAt` is not after `startsAt`;
    /// - `BILLBOARD_NOT_EXISTS` - one of the `Billboard`s does not exist;
    /// - `BILLBOARD_NOT_AVAILABLE` - one of the `Billboard`s is not
    ///                               available;
    /// - `CURRENCY_MISMATCH` - prices are in different currencies.
    #[tracing::instrument(
        skip_all,
        fields(
            billboard_ids = ?billboard_ids,
            customer = %customer,
            ends_at = ?ends_at,
            gql.name = "createContract",
            otel.name = Self::SPAN_NAME,
            starts_at = ?starts_at,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn create_contract(
        customer: api::contract::Customer,
        phone: Option<api::contract::Phone>,
        ad_type: Option<api::contract::AdType>,
        billboard_ids: Vec<api::billboard::Id>,
        starts_at: DateTime,
        ends_at: DateTime,
        discount: Option<Percent>,
        installation_cost: Option<Money>,
        payment_due_at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(command::CreateContract {
                customer: customer.into(),
                phone: phone.map(Into::into),
                ad_type: ad_type.map(Into::into),
                billboard_ids: billboard_ids
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                starts_at: starts_at.coerce(),
                ends_at: ends_at.coerce(),
                discount,
                installation_cost,
                payment_due_at: payment_due_at.map(|at| at.coerce()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Terminates the `Contract` before its end, releasing its `Billboard`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does not
    ///                           exist;
    /// - `CONTRACT_ALREADY_TERMINATED` - the `Contract` is terminated already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "terminateContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn terminate_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(command::TerminateContract {
                contract_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records a `Payment` for the `Contract`, issuing a receipt.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does not
    ///                           exist;
    /// - `NON_POSITIVE_AMOUNT` - the `amount` is zero or negative;
    /// - `CURRENCY_MISMATCH` - the `amount` is not in the `Contract` currency;
    /// - `OVERPAYMENT` - the `amount` exceeds the remaining balance.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            contract_id = %contract_id,
            gql.name = "recordPayment",
            method = ?method,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn record_payment(
        contract_id: api::contract::Id,
        amount: Money,
        method: api::payment::Method,
        note: Option<api::payment::Note>,
        paid_at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(command::RecordPayment {
                contract_id: contract_id.into(),
                amount,
                method: method.into(),
                note: note.map(Into::into),
                paid_at: paid_at.map(|at| at.coerce()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Converts the provided [`Nullable`] GraphQL argument into an update of a
/// clearable field.
fn clearable<T: Into<U>, U>(value: Nullable<T>) -> Option<Option<U>> {
    value.explicit().map(|v| v.map(Into::into))
}
