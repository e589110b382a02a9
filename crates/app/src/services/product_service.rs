//! Product service: use-cases for the shop's merchandise.

use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::form::Form;
use gymhub_domain::id::ProductId;
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::product::{NewProduct, Product, ProductDraft, ProductFilter};

use crate::attachments;
use crate::ports::{FileStore, ProductRepository};

/// Application service for product CRUD.
pub struct ProductService<R, F> {
    repo: R,
    files: F,
}

impl<R: ProductRepository, F: FileStore> ProductService<R, F> {
    pub fn new(repo: R, files: F) -> Self {
        Self { repo, files }
    }

    /// One page of products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, GymHubError> {
        self.repo.list(filter, page).await
    }

    /// Look up a product by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] when no product with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, GymHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Product",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Validate `form`, store up to three images and persist the product.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a field is invalid, or a
    /// file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn create_product(&self, form: Form) -> Result<Product, GymHubError> {
        let draft = ProductDraft::from_form(form)?;
        let images = attachments::store_many(
            &self.files,
            Product::STORAGE_DIR,
            draft.images.unwrap_or_default(),
        )
        .await?;

        let new = NewProduct {
            title: draft.title,
            description: draft.description.flatten(),
            price: draft.price,
            color: draft.color.flatten(),
            composition: draft.composition.flatten(),
            images: images.clone(),
        };
        match self.repo.create(new).await {
            Ok(created) => {
                tracing::info!(product_id = %created.id, images = created.images.len(), "product created");
                Ok(created)
            }
            Err(err) => {
                attachments::discard(&self.files, &images).await;
                Err(err)
            }
        }
    }

    /// Update an existing product. Optional fields left out of the form keep
    /// their value; uploading images replaces the whole gallery.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the product does not exist,
    /// [`GymHubError::Validation`] when the form is invalid, or a
    /// file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_product(&self, id: ProductId, form: Form) -> Result<Product, GymHubError> {
        let mut product = self.get_product(id).await?;
        let draft = ProductDraft::from_form(form)?;

        let images = match draft.images {
            Some(uploads) => {
                Some(attachments::store_many(&self.files, Product::STORAGE_DIR, uploads).await?)
            }
            None => None,
        };
        let previous = match &images {
            Some(paths) => std::mem::replace(&mut product.images, paths.clone()),
            None => Vec::new(),
        };
        product.title = draft.title;
        product.price = draft.price;
        if let Some(description) = draft.description {
            product.description = description;
        }
        if let Some(color) = draft.color {
            product.color = color;
        }
        if let Some(composition) = draft.composition {
            product.composition = composition;
        }

        match self.repo.update(product).await {
            Ok(updated) => {
                attachments::discard(&self.files, &previous).await;
                tracing::info!(product_id = %id, "product updated");
                Ok(updated)
            }
            Err(err) => {
                attachments::discard(&self.files, images.as_deref().unwrap_or_default()).await;
                Err(err)
            }
        }
    }

    /// Delete a product and its images.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the product does not exist, or
    /// a file/storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), GymHubError> {
        let current = self.get_product(id).await?;
        attachments::remove_all(&self.files, &current.images).await?;
        self.repo.delete(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Number of stored products.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_products(&self) -> Result<u64, GymHubError> {
        self.repo.count().await
    }
}
